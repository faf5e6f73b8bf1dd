use clap::{Parser, Subcommand};
use dnsdial::{
    DnsConfigurator, DnsPair, NetshBackend, ProfileStore, find_active_interface_with_dns,
};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "dnsdial",
    version,
    about = "Switch and save DNS servers for the active network interface"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the active interface and its configured DNS servers
    Show,
    /// Set static DNS servers on the active interface
    Set {
        preferred: String,
        alternative: Option<String>,
    },
    /// Revert the active interface to automatic (DHCP) DNS
    Reset,
    /// Save a named DNS profile
    Save {
        name: String,
        preferred: String,
        alternative: Option<String>,
    },
    /// Apply a saved profile to the active interface
    Apply { name: String },
    /// Delete a saved profile
    Delete { name: String },
    /// List saved profiles
    List,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    if let Err(message) = run(Cli::parse().command).await {
        eprintln!("error: {message}");
        std::process::exit(1);
    }
}

async fn run(command: Commands) -> Result<(), String> {
    let backend = NetshBackend::new();

    match command {
        Commands::Show => {
            show_current(&backend).await;
        }
        Commands::Set {
            preferred,
            alternative,
        } => {
            let configurator = DnsConfigurator::new(backend);
            let interface = configurator
                .change_dns(&preferred, alternative.as_deref())
                .await
                .map_err(|e| e.to_string())?;
            println!("DNS settings changed for {interface}");
            show_current(&backend).await;
        }
        Commands::Reset => {
            let configurator = DnsConfigurator::new(backend);
            let interface = configurator.reset_dns().await.map_err(|e| e.to_string())?;
            println!("DNS settings reset for {interface}");
            show_current(&backend).await;
        }
        Commands::Save {
            name,
            preferred,
            alternative,
        } => {
            let store = default_store()?;
            store
                .save(&name, &DnsPair::new(preferred, alternative))
                .map_err(|e| e.to_string())?;
            println!("Saved profile \"{name}\"");
        }
        Commands::Apply { name } => {
            let store = default_store()?;
            let profiles = store.load_all();
            let pair = profiles
                .get(&name)
                .ok_or_else(|| format!("no saved profile named \"{name}\""))?;

            let configurator = DnsConfigurator::new(backend);
            let interface = configurator.apply(pair).await.map_err(|e| e.to_string())?;
            println!("Applied profile \"{name}\" to {interface}");
            show_current(&backend).await;
        }
        Commands::Delete { name } => {
            let store = default_store()?;
            store.delete(&name).map_err(|e| e.to_string())?;
            println!("Deleted profile \"{name}\"");
        }
        Commands::List => {
            let profiles = default_store()?.load_all();
            if profiles.is_empty() {
                println!("No saved profiles.");
            }
            for (name, pair) in &profiles {
                match &pair.alternative {
                    Some(alternative) => println!("{name}: {} / {alternative}", pair.preferred),
                    None => println!("{name}: {}", pair.preferred),
                }
            }
        }
    }

    Ok(())
}

fn default_store() -> Result<ProfileStore, String> {
    ProfileStore::default_location().map_err(|e| e.to_string())
}

async fn show_current(backend: &NetshBackend) {
    let active = find_active_interface_with_dns(backend).await;
    match active.interface {
        Some(interface) => {
            println!("Interface:   {interface}");
            println!(
                "Preferred:   {}",
                active.preferred.as_deref().unwrap_or("(automatic)")
            );
            println!(
                "Alternative: {}",
                active.alternative.as_deref().unwrap_or("-")
            );
        }
        None => println!("No active network interface found."),
    }
}
