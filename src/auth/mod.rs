//! User accounts, sessions and the pages for registering, logging in and out.

mod cookie;
mod customize;
mod log_in;
mod log_out;
mod middleware;
mod password;
mod redirect;
pub(crate) mod register_user;
mod token;
mod user;

pub use cookie::{DEFAULT_COOKIE_DURATION, invalidate_auth_cookie, set_auth_cookie};
pub use customize::{get_customize_page, post_customize};
pub use log_in::{get_log_in_page, post_log_in};
pub use log_out::get_log_out;
pub use middleware::{auth_guard, auth_guard_hx};
pub use password::{PasswordHash, ValidatedPassword};
pub use redirect::{build_log_in_redirect_url, normalize_redirect_url};
pub use register_user::{get_register_page, register_user};
pub use user::{
    DisplayName, User, UserID, Username, create_user, create_user_table, get_user_by_id,
    get_user_by_username, set_display_name,
};

#[cfg(test)]
pub(crate) use cookie::COOKIE_TOKEN;
