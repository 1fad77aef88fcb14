use std::error::Error;
use std::path::Path;
use std::process::exit;

use clap::Parser;
use rusqlite::Connection;
use time::{Duration, OffsetDateTime};

use gym_ledger::{NewExpense, NewIncome, create_expense, create_income, initialize_db};

/// A utility for creating a test database for the gym_ledger server.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to save the SQLite database to.
    #[arg(long, short)]
    output_path: String,

    /// The number of days of sample records to create, ending today.
    #[arg(long, short, default_value_t = 30)]
    days: i64,
}

/// Create and populate a database for manual testing.
fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    let output_path = Path::new(&args.output_path);

    match output_path.extension() {
        None => {
            eprintln!("Output path must include a file extension (e.g., 'my_database.db').");
            exit(1);
        }
        Some(extension) if extension.is_empty() => {
            eprintln!("Output path must include a file extension (e.g., 'my_database.db').");
            exit(1);
        }
        _ => {}
    }

    if output_path.is_file() {
        eprintln!("File already exists at {output_path:#?}!");
        exit(1);
    }

    println!("Creating database at {output_path:#?}");
    let conn = Connection::open(output_path)?;

    initialize_db(&conn)?;

    println!("Creating {} days of income and expense records...", args.days);

    let today = OffsetDateTime::now_utc().date();

    for days_ago in (0..args.days).rev() {
        let date = (today - Duration::days(days_ago)).to_string();
        let men = 200 + (days_ago * 37) % 150;
        let girls = 120 + (days_ago * 53) % 110;

        create_income(
            NewIncome::parse(&date, &men.to_string(), &girls.to_string())?,
            &conn,
        )?;

        // Electricity and maintenance weekly, rent and salaries every four weeks.
        if days_ago % 7 == 0 {
            create_expense(NewExpense::parse(&date, "Electricity", "85.40")?, &conn)?;
            create_expense(NewExpense::parse(&date, "Maintenance", "42.00")?, &conn)?;
        }

        if days_ago % 28 == 0 {
            create_expense(NewExpense::parse(&date, "Rent", "1500.00")?, &conn)?;
            create_expense(NewExpense::parse(&date, "Trainer Salary", "2200.00")?, &conn)?;
        }
    }

    create_expense(
        NewExpense::parse(&today.to_string(), "Gym Equipment", "649.99")?,
        &conn,
    )?;

    println!("Success!");

    Ok(())
}
