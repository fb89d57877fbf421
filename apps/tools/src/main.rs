use anyhow::{anyhow, Result};
use clap::{Parser, Subcommand};
use shared::{
    domain::{Role, UserId},
    listing::{NewRoom, PriceBand, RoomFilter},
};
use storage::{Directory, Storage};

#[derive(Parser, Debug)]
#[command(name = "studentnest-tools", about = "Maintenance commands for the StudentNest database")]
struct Cli {
    #[arg(long, default_value = "sqlite://./data/studentnest.db")]
    database_url: String,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Create the database file and run migrations.
    Init,
    /// Create an account of any type, including admins.
    CreateUser {
        username: String,
        password: String,
        display_name: String,
        #[arg(long, default_value = "student")]
        role: Role,
    },
    AddRoom {
        owner_id: i64,
        location: String,
        price: f64,
        #[arg(long, default_value = "")]
        description: String,
        #[arg(long)]
        room_type: Option<String>,
        #[arg(long)]
        contact_number: Option<String>,
        #[arg(long)]
        map_link: Option<String>,
    },
    ListRooms {
        #[arg(long)]
        location: Option<String>,
        /// One of "0-5000", "5000-10000", "10000-15000", "15000+".
        #[arg(long)]
        price_band: Option<String>,
        #[arg(long)]
        available_only: bool,
    },
}

fn parse_price_band(label: Option<&str>) -> Result<PriceBand> {
    match label {
        None => Ok(PriceBand::Any),
        Some(label) => PriceBand::from_label(label).ok_or_else(|| {
            let known: Vec<&str> = PriceBand::ALL.iter().map(|band| band.label()).collect();
            anyhow!("unknown price band {label:?}; expected one of {}", known.join(", "))
        }),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt().with_env_filter("info").init();

    let cli = Cli::parse();
    let storage = Storage::new(&cli.database_url).await?;

    match cli.command {
        Command::Init => {
            storage.health_check().await?;
            println!("database ready at {}", cli.database_url);
        }
        Command::CreateUser {
            username,
            password,
            display_name,
            role,
        } => {
            let user_id = storage
                .register_user(&username, &password, &display_name, role)
                .await?;
            println!("created user_id={} role={}", user_id.0, role.as_db_str());
        }
        Command::AddRoom {
            owner_id,
            location,
            price,
            description,
            room_type,
            contact_number,
            map_link,
        } => {
            let room = NewRoom {
                location,
                price,
                description,
                room_type,
                contact_number,
                map_link,
            };
            let room_id = storage.add_room(UserId(owner_id), &room).await?;
            println!("created room_id={}", room_id.0);
        }
        Command::ListRooms {
            location,
            price_band,
            available_only,
        } => {
            let filter = RoomFilter {
                location,
                price: parse_price_band(price_band.as_deref())?,
                available_only,
            };
            for room in storage.list_rooms(&filter).await? {
                println!(
                    "{}\t{}\t{}\t{}\t{}",
                    room.room_id,
                    room.location,
                    room.formatted_price(),
                    room.owner_name,
                    if room.available { "available" } else { "taken" }
                );
            }
        }
    }

    Ok(())
}
