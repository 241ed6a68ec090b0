use std::fs::File;
use std::io::Read;
use std::path::PathBuf;
use std::process;

use anyhow::{Context, Result};
use chrono::SecondsFormat;
use log::*;
use serde::Deserialize;
use structopt::StructOpt;

use canteen::auth::{CurrentCollege, Login, Logout, SignUp};
use canteen::cart::{CartCount, CartTotal, SetQuantity, ShowCart};
use canteen::keys::Key;
use canteen::menu::{Category, LookupItem, ShowMenu};
use canteen::orders::{PlaceOrder, SetStatus, ShowHistory, Status};
use canteen::ratings::{ListRatings, ShowAverages, SubmitRating};
use canteen::services::{Commandable, Queryable};
use canteen::students::{CurrentStudent, ListStudents, SaveStudent, SelectStudent, Student};
use canteen::{Canteen, CanteenError};

#[derive(Debug, StructOpt)]
#[structopt(name = "canteen", about = "Campus canteen ordering")]
struct Opt {
    /// Configuration file
    #[structopt(parse(from_os_str))]
    config: PathBuf,
    #[structopt(subcommand)]
    command: Commands,
}

#[derive(Debug, StructOpt)]
enum Commands {
    #[structopt(name = "setup", about = "Write default records")]
    Setup,
    #[structopt(name = "sign-up", about = "Register a college")]
    SignUp { college: String, password: String },
    #[structopt(name = "login", about = "Log in as a college")]
    Login { college: String, password: String },
    #[structopt(name = "logout", about = "Log out")]
    Logout,
    #[structopt(name = "students", about = "List students")]
    Students,
    #[structopt(name = "save-student", about = "Add or update a student")]
    SaveStudent(StudentForm),
    #[structopt(name = "select-student", about = "Choose who is ordering")]
    SelectStudent { id: String },
    #[structopt(name = "menu", about = "Show a menu category")]
    Menu { category: Category },
    #[structopt(name = "set-quantity", about = "Set how many of an item are in the cart")]
    SetQuantity { item: String, quantity: u32 },
    #[structopt(name = "cart", about = "Show the cart")]
    Cart,
    #[structopt(name = "place-order", about = "Order everything in the cart")]
    PlaceOrder,
    #[structopt(name = "history", about = "Show placed orders")]
    History,
    #[structopt(name = "complete", about = "Mark an order completed")]
    Complete { entry: String },
    #[structopt(name = "cancel", about = "Cancel an order")]
    Cancel { entry: String },
    #[structopt(name = "rate", about = "Rate a completed order")]
    Rate {
        entry: String,
        service: u8,
        taste: u8,
        #[structopt(long = "comments")]
        comments: Option<String>,
    },
    #[structopt(name = "ratings", about = "Show ratings and averages")]
    Ratings,
}

#[derive(Debug, StructOpt)]
struct StudentForm {
    #[structopt(long = "id")]
    id: Option<String>,
    name: String,
    college: String,
    #[structopt(long = "email")]
    email: Option<String>,
    #[structopt(long = "contact")]
    contact: Option<String>,
    #[structopt(long = "year")]
    year: Option<String>,
    #[structopt(long = "preferences")]
    preferences: Option<String>,
}

#[derive(Deserialize, Debug)]
struct Config {
    #[serde(flatten)]
    canteen: canteen::config::Config,
    #[serde(default)]
    env_logger: canteen::config::EnvLogger,
}

fn main() {
    let opt = Opt::from_args();

    if let Err(err) = run(opt) {
        match err.downcast_ref::<CanteenError>() {
            Some(notice) => eprintln!("{}", notice),
            None => eprintln!("Error: {:?}", err),
        }
        process::exit(1);
    }
}

fn run(opt: Opt) -> Result<()> {
    let mut config_buf = String::new();
    File::open(&opt.config)
        .and_then(|mut f| f.read_to_string(&mut config_buf))
        .with_context(|| format!("read {:?}", opt.config))?;
    let mut config: Config = toml::from_str(&config_buf).context("parse config")?;

    config.env_logger.builder().init();
    config.canteen.apply_env()?;
    debug!("Config: {:?}", config);

    let app = Canteen::open(&config.canteen)?;
    app.setup();

    let cart = app.cart();
    app.store().subscribe(move |key| {
        if key == Key::Cart.name() {
            match cart.query(CartCount) {
                Ok(n) => println!("Cart: {} items", n),
                Err(e) => warn!("Could not count cart: {:?}", e),
            }
        }
    });

    match opt.command {
        Commands::Setup => {}
        Commands::SignUp { college, password } => {
            let college = app.auth().execute(SignUp {
                college_name: college,
                password,
            })?;
            println!("Account created for {}", college.college_name);
        }
        Commands::Login { college, password } => {
            let college = app.auth().execute(Login {
                college_name: college,
                password,
            })?;
            println!("Logged in as {}", college.college_name);
        }
        Commands::Logout => {
            app.auth().execute(Logout)?;
        }
        Commands::Students => {
            let current = app.students().query(CurrentStudent)?.map(|s| s.student_id);
            for s in app.students().query(ListStudents)? {
                let marker = if Some(&s.student_id) == current.as_ref() {
                    "*"
                } else {
                    " "
                };
                println!("{} {}: {} ({})", marker, s.student_id, s.name, s.college);
            }
        }
        Commands::SaveStudent(form) => {
            let student = Student {
                student_id: form.id.unwrap_or_default(),
                email: form.email,
                contact: form.contact,
                year: form.year,
                preferences: form.preferences,
                ..Student::new(&form.name, &form.college)
            };
            let saved = app.students().execute(SaveStudent { student })?;
            println!("Saved {}", saved.student_id);
        }
        Commands::SelectStudent { id } => {
            let s = app.students().execute(SelectStudent { student_id: id })?;
            println!("Ordering for {}", s.name);
        }
        Commands::Menu { category } => {
            println!("{}", category);
            for item in app.menu().query(ShowMenu { category })? {
                let note = if item.available {
                    String::new()
                } else {
                    format!(
                        " (unavailable{})",
                        item.unavailable_note
                            .map(|n| format!(": {}", n))
                            .unwrap_or_default()
                    )
                };
                println!("{}: {} @ {}{}", item.id, item.name, item.price, note);
            }
        }
        Commands::SetQuantity { item, quantity } => {
            let item = app
                .menu()
                .query(LookupItem {
                    item_id: item.clone(),
                })?
                .ok_or_else(|| CanteenError::UnknownItem(item))?;
            app.cart().execute(SetQuantity { item, quantity })?;
        }
        Commands::Cart => {
            for line in app.cart().query(ShowCart)? {
                println!(
                    "{}: {} x {} = {}",
                    line.item_id,
                    line.name,
                    line.quantity,
                    line.line_total()
                );
            }
            println!("Total: {}", app.cart().query(CartTotal)?);
        }
        Commands::PlaceOrder => {
            let entry = app.orders().execute(PlaceOrder)?;
            println!("Placed {} ({})", entry.entry_id, entry.total);
        }
        Commands::History => {
            for entry in app.orders().query(ShowHistory)? {
                println!(
                    "{} {} {} {} {}",
                    entry.entry_id,
                    entry.timestamp.to_rfc3339_opts(SecondsFormat::Secs, true),
                    entry.student_name,
                    entry.status,
                    entry.total
                );
                for item in entry.items {
                    println!("    {} x {}", item.name, item.quantity);
                }
            }
        }
        Commands::Complete { entry } => {
            set_status(&app, entry, Status::Completed)?;
        }
        Commands::Cancel { entry } => {
            set_status(&app, entry, Status::Cancelled)?;
        }
        Commands::Rate {
            entry,
            service,
            taste,
            comments,
        } => {
            app.ratings().execute(SubmitRating {
                entry_id: Some(entry),
                service_rating: service,
                taste_rating: taste,
                comments,
            })?;
            println!("Thank you for your feedback!");
        }
        Commands::Ratings => {
            if let Some(college) = app.auth().query(CurrentCollege)? {
                println!("{}", college);
            }
            println!("Averages: {}", app.ratings().query(ShowAverages)?);
            for r in app.ratings().query(ListRatings)? {
                println!(
                    "{} service:{} taste:{} {}",
                    r.entry_id,
                    r.service_rating,
                    r.taste_rating,
                    r.comments.unwrap_or_default()
                );
            }
        }
    }

    Ok(())
}

fn set_status<S: infra::persistence::Storage>(
    app: &Canteen<S>,
    entry_id: String,
    status: Status,
) -> Result<()> {
    let entry = app.orders().execute(SetStatus { entry_id, status })?;
    println!("Order {} {}", entry.entry_id, entry.status);
    Ok(())
}
