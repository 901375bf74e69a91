use std::error::Error;
use std::path::Path;
use std::process::exit;

use clap::Parser;
use rusqlite::Connection;
use time::{Duration, OffsetDateTime};

use spendlog::{
    Expense, PasswordHash, Username, ValidatedPassword, create_default_categories, create_expense,
    create_user, get_category_by_name, initialize_db,
};

/// A utility for creating a database with a demo user and sample expenses for manual testing.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to save the SQLite database to.
    #[arg(long, short)]
    output_path: String,
}

/// (description, amount, category, days ago)
const SAMPLE_EXPENSES: [(&str, f64, &str, i64); 10] = [
    ("Groceries", 84.32, "Food", 1),
    ("Bus fare", 3.5, "Transportation", 1),
    ("Movie night", 24.0, "Entertainment", 3),
    ("Coffee, large", 5.25, "Food", 4),
    ("Electricity", 112.9, "Utilities", 6),
    ("Streaming service", 15.99, "Subscriptions", 9),
    ("Rent", 450.0, "Rent", 10),
    ("Takeaways", 32.4, "Food", 12),
    ("Train ticket", 7.8, "Transportation", 15),
    ("Internet", 79.0, "Utilities", 20),
];

/// Create and populate a database for manual testing.
fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    let output_path = Path::new(&args.output_path);

    match output_path.extension() {
        Some(extension) if !extension.is_empty() => {}
        _ => {
            eprintln!("Output path must include a file extension (e.g., 'my_database.db').");
            exit(1);
        }
    }

    if output_path.is_file() {
        eprintln!("File already exists at {output_path:#?}!");
        exit(1);
    }

    println!("Creating database at {output_path:#?}");
    let connection = Connection::open(output_path)?;

    initialize_db(&connection)?;

    println!("Creating demo user...");

    let password_hash = PasswordHash::new(
        ValidatedPassword::new_unchecked("test"),
        PasswordHash::DEFAULT_COST,
    )?;
    let user = create_user(Username::new("demo")?, password_hash, &connection)?;
    create_default_categories(user.id, &connection)?;

    println!("Adding sample expenses...");

    let today = OffsetDateTime::now_utc().date();

    for (description, amount, category_name, days_ago) in SAMPLE_EXPENSES {
        let category = get_category_by_name(category_name, user.id, &connection)?;
        let date = today - Duration::days(days_ago);

        create_expense(
            Expense::build(user.id, description, amount, date).category_id(category.id),
            &connection,
        )?;
    }

    println!("Success! Log in as \"demo\" with the password \"test\".");

    Ok(())
}
