//! The navigation bar shown at the top of every page behind the log in.

use maud::{Markup, html};

use crate::{endpoints, html::APP_NAME};

/// A link in the navigation bar.
///
/// It will change appearance if `is_current` is set to `true`.
/// Only one link should be set as active at any one time.
#[derive(Clone)]
struct Link<'a> {
    url: &'a str,
    title: &'a str,
    is_current: bool,
}

impl Link<'_> {
    fn into_html(self) -> Markup {
        let style = if self.is_current {
            "block py-2 px-3 text-white bg-blue-700 rounded-sm md:bg-transparent \
            md:text-blue-700 md:p-0 dark:text-white md:dark:text-blue-500"
        } else {
            "block py-2 px-3 text-gray-900 rounded-sm hover:bg-gray-100 \
            md:hover:bg-transparent md:border-0 md:hover:text-blue-700 md:p-0 \
            dark:text-white md:dark:hover:text-blue-500 dark:hover:bg-gray-700 \
            dark:hover:text-white md:dark:hover:bg-transparent"
        };

        html!( a href=(self.url) class=(style) { (self.title) } )
    }
}

pub struct NavBar<'a> {
    links: Vec<Link<'a>>,
}

impl NavBar<'_> {
    /// Get the navigation bar.
    ///
    /// If a link matches `active_endpoint`, then that link will be
    /// marked as active and displayed differently in the HTML.
    pub fn new(active_endpoint: &str) -> NavBar<'_> {
        let links = vec![
            Link {
                url: endpoints::DASHBOARD,
                title: "Dashboard",
                is_current: active_endpoint == endpoints::DASHBOARD,
            },
            Link {
                url: endpoints::CATEGORIES,
                title: "Categories",
                is_current: active_endpoint == endpoints::CATEGORIES,
            },
            Link {
                url: endpoints::CUSTOMIZE,
                title: "Profile",
                is_current: active_endpoint == endpoints::CUSTOMIZE,
            },
            Link {
                url: endpoints::LOG_OUT,
                title: "Log out",
                is_current: false,
            },
        ];

        NavBar { links }
    }

    pub fn into_html(self) -> Markup {
        html!(
            nav class="bg-white border-gray-200 dark:bg-gray-900"
            {
                div class="max-w-screen-xl flex flex-wrap items-center justify-between mx-auto p-4"
                {
                    a href=(endpoints::DASHBOARD) class="flex items-center"
                    {
                        span class="self-center text-2xl font-semibold whitespace-nowrap dark:text-white"
                        {
                            (APP_NAME)
                        }
                    }

                    ul class="font-medium flex flex-col p-4 md:p-0 mt-4 md:flex-row \
                        md:space-x-8 rtl:space-x-reverse md:mt-0"
                    {
                        @for link in self.links {
                            li { (link.into_html()) }
                        }
                    }
                }
            }
        )
    }
}
