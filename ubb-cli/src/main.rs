//! UBB CLI
//!
//! Command-line interface for the UBB academic registry.

use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use colored::*;
use tracing::debug;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use ubb_api::{ApiConfig, ApiServer, EnvSettings};
use ubb_core::constants::DEFAULT_API_PORT;
use ubb_core::types::{EthAddress, Student};
use ubb_core::AcademicRegistry;
use ubb_registry::FileRegistry;

/// Registry file used when neither `--registry` nor an environment setting names one.
const DEFAULT_REGISTRY: &str = "registry.ubb";

/// UBB - Academic registry for faculties, specializations and students
#[derive(Parser)]
#[command(name = "ubb")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to the registry file [default: registry.ubb]
    #[arg(short, long, global = true, env = "UBB_REGISTRY")]
    registry: Option<PathBuf>,

    /// Address the command acts as (required for mutations)
    #[arg(short, long, global = true, env = "UBB_CALLER")]
    caller: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a new registry file administered by OWNER
    Init {
        /// Administrator address
        #[arg(long)]
        owner: String,
    },

    /// Add a faculty
    AddFaculty {
        /// Full faculty name
        name: String,
        /// Unique short symbol
        symbol: String,
    },

    /// Show a faculty
    Faculty {
        /// Faculty symbol
        symbol: String,
    },

    /// Add a specialization under an existing faculty
    AddSpecialization {
        /// Unique specialization name
        name: String,
        /// Program length in years
        duration_years: u32,
        /// Symbol of the owning faculty
        faculty_symbol: String,
    },

    /// Show a specialization and its faculty
    Specialization {
        /// Specialization name
        name: String,
    },

    /// Register a student
    AddStudent {
        /// Student identity address
        address: String,
        /// Full name
        name: String,
        /// National id (CNP)
        national_id: String,
        /// Name of an existing specialization
        specialization: String,
    },

    /// Verify a student by address or national id
    Verify(VerifyArgs),

    /// Mark a student finished
    Finish {
        /// National id (CNP)
        national_id: String,
    },

    /// Mark a student suspended
    Suspend {
        /// National id (CNP)
        national_id: String,
    },

    /// Show registry counts
    Stats,

    /// Load the demo faculty, specialization and student
    Seed,

    /// Run the API server over the registry file
    ///
    /// UBB_OWNER_ADDRESS, UBB_DATA_PATH and UBB_AUTO_SAVE (or a .env file)
    /// apply where no flag is given.
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value_t = DEFAULT_API_PORT)]
        port: u16,
        /// Bind address
        #[arg(short, long, default_value = "0.0.0.0")]
        bind: String,
        /// Administrator address (needed when the registry file does not exist yet)
        #[arg(long)]
        owner: Option<String>,
        /// Keep the registry in memory instead of the registry file
        #[arg(long)]
        in_memory: bool,
    },
}

#[derive(Args)]
#[group(required = true, multiple = false)]
struct VerifyArgs {
    /// Student identity address
    #[arg(long)]
    address: Option<String>,
    /// National id (CNP)
    #[arg(long)]
    cnp: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        "ubb=debug,ubb_registry=debug,ubb_api=debug,info"
    } else {
        "ubb=info,warn"
    };

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let path = cli
        .registry
        .as_deref()
        .unwrap_or_else(|| Path::new(DEFAULT_REGISTRY));
    let caller = cli.caller.as_deref();

    match cli.command {
        Commands::Init { owner } => cmd_init(path, &owner).await,
        Commands::AddFaculty { name, symbol } => {
            mutate(path, caller, |reg, caller| async move {
                reg.add_faculty(&caller, &name, &symbol).await?;
                println!("{} {} ({})", "✅ Faculty added:".green(), name, symbol);
                Ok(())
            })
            .await
        }
        Commands::Faculty { symbol } => cmd_faculty(path, &symbol).await,
        Commands::AddSpecialization {
            name,
            duration_years,
            faculty_symbol,
        } => {
            mutate(path, caller, |reg, caller| async move {
                reg.add_specialization(&caller, &name, duration_years, &faculty_symbol)
                    .await?;
                println!("{} {} → {}", "✅ Specialization added:".green(), name, faculty_symbol);
                Ok(())
            })
            .await
        }
        Commands::Specialization { name } => cmd_specialization(path, &name).await,
        Commands::AddStudent {
            address,
            name,
            national_id,
            specialization,
        } => {
            let address = parse_address(&address)?;
            mutate(path, caller, |reg, caller| async move {
                reg.add_student(&caller, &address, &name, &national_id, &specialization)
                    .await?;
                println!("{} {} ({})", "✅ Student registered:".green(), name, address);
                Ok(())
            })
            .await
        }
        Commands::Verify(args) => cmd_verify(path, args).await,
        Commands::Finish { national_id } => {
            mutate(path, caller, |reg, caller| async move {
                reg.mark_finished(&caller, &national_id).await?;
                println!("{} {}", "🎓 Student marked finished:".green(), national_id);
                Ok(())
            })
            .await
        }
        Commands::Suspend { national_id } => {
            mutate(path, caller, |reg, caller| async move {
                reg.mark_suspended(&caller, &national_id).await?;
                println!("{} {}", "⏸  Student marked suspended:".yellow(), national_id);
                Ok(())
            })
            .await
        }
        Commands::Stats => cmd_stats(path).await,
        Commands::Seed => {
            mutate(path, caller, |reg, caller| async move {
                seed(reg.as_ref(), &caller).await?;
                println!("{}", "🌱 Demo records loaded".green());
                Ok(())
            })
            .await
        }
        Commands::Serve {
            port,
            bind,
            owner,
            in_memory,
        } => cmd_serve(cli.registry.as_deref(), port, &bind, owner.as_deref(), in_memory).await,
    }
}

fn parse_address(s: &str) -> Result<EthAddress> {
    EthAddress::from_hex(s).with_context(|| format!("Invalid address: {s}"))
}

async fn open_registry(path: &Path) -> Result<FileRegistry> {
    FileRegistry::open(path).await.with_context(|| {
        format!(
            "Failed to open registry {} (create one with `ubb init --owner <address>`)",
            path.display()
        )
    })
}

/// Opens the registry, runs one mutation as `caller`, then persists it.
async fn mutate<F, Fut>(path: &Path, caller: Option<&str>, op: F) -> Result<()>
where
    F: FnOnce(Arc<FileRegistry>, EthAddress) -> Fut,
    Fut: std::future::Future<Output = Result<()>>,
{
    let Some(caller) = caller else {
        bail!("--caller (or UBB_CALLER) is required for this command");
    };
    let caller = parse_address(caller)?;
    debug!(path = %path.display(), %caller, "Applying registry mutation");

    let registry = Arc::new(open_registry(path).await?);
    op(registry.clone(), caller).await?;
    registry.flush().await.context("Failed to save registry")?;
    Ok(())
}

/// Create a new registry file
async fn cmd_init(path: &Path, owner: &str) -> Result<()> {
    if path.exists() {
        bail!("Registry file {} already exists", path.display());
    }
    let owner = parse_address(owner)?;

    let registry = FileRegistry::new(path, owner).await?;
    registry.save().await.context("Failed to write registry file")?;

    println!("{} {}", "✅ Registry created:".green().bold(), path.display());
    println!("   {} {}", "Owner:".dimmed(), owner);
    Ok(())
}

/// Show a faculty
async fn cmd_faculty(path: &Path, symbol: &str) -> Result<()> {
    let registry = open_registry(path).await?;
    match registry.get_faculty(symbol).await? {
        Some(faculty) => {
            println!("{} {}", "🏛  Faculty:".cyan().bold(), faculty.symbol);
            println!("   {} {}", "Name:".dimmed(), faculty.name);
        }
        None => println!("{}", "Unknown Faculty".red()),
    }
    Ok(())
}

/// Show a specialization
async fn cmd_specialization(path: &Path, name: &str) -> Result<()> {
    let registry = open_registry(path).await?;
    match registry.get_specialization(name).await? {
        Some(view) => {
            println!("{} {}", "📚 Specialization:".cyan().bold(), view.specialization.name);
            println!("   {} {} years", "Duration:".dimmed(), view.specialization.duration_years);
            println!("   {} {}", "Faculty:".dimmed(), view.faculty_symbol);
        }
        None => println!("{}", "Unknown Specialisation".red()),
    }
    Ok(())
}

/// Verify a student by address or CNP
async fn cmd_verify(path: &Path, args: VerifyArgs) -> Result<()> {
    let registry = open_registry(path).await?;

    let student = match (args.address, args.cnp) {
        (Some(address), _) => registry.verify_by_address(&parse_address(&address)?).await?,
        (None, Some(cnp)) => registry.verify_by_national_id(&cnp).await?,
        (None, None) => bail!("either --address or --cnp is required"),
    };

    match student {
        Some(student) => print_student(&student),
        None => println!("{}", "Non-Existing Student".red()),
    }
    Ok(())
}

fn print_student(student: &Student) {
    println!("{} {}", "🎓 Student:".cyan().bold(), student.name);
    println!("   {} {}", "Address:".dimmed(), student.address);
    println!("   {} {}", "CNP:".dimmed(), student.national_id);
    println!("   {} {}", "Specialization:".dimmed(), student.specialization);
    println!("   {} {}", "Finished:".dimmed(), student.finished());
    println!("   {} {}", "Suspended:".dimmed(), student.suspended());
}

/// Show registry counts
async fn cmd_stats(path: &Path) -> Result<()> {
    let registry = open_registry(path).await?;
    let stats = registry.stats().await?;

    println!("{}", "📊 Registry".cyan().bold());
    println!("   {} {}", "Owner:".dimmed(), registry.owner());
    println!("{}", serde_json::to_string_pretty(&stats)?);
    Ok(())
}

/// The records the deployment script seeds a fresh registry with.
async fn seed(registry: &dyn AcademicRegistry, caller: &EthAddress) -> Result<()> {
    const FACULTY: &str = "Facultatea de Stiinte Economice si Gestiunea Afacerilor";
    const SYMBOL: &str = "FSEGA";
    const SPECIALIZATION: &str = "Informatica Economica";

    let student = parse_address("0x6e33A711D62aea5a248a7035f3Cb2509146ab293")?;

    registry.add_faculty(caller, FACULTY, SYMBOL).await?;
    registry
        .add_specialization(caller, SPECIALIZATION, 3, SYMBOL)
        .await?;
    registry
        .add_student(caller, &student, "Toro Etele", "5010324142390", SPECIALIZATION)
        .await?;
    Ok(())
}

/// Resolves the server config: flags first, then the environment, then defaults.
async fn serve_config(
    registry: Option<&Path>,
    owner: Option<EthAddress>,
    in_memory: bool,
    env: EnvSettings,
) -> Result<ApiConfig> {
    let data_path = if in_memory {
        None
    } else {
        Some(
            registry
                .map(Path::to_path_buf)
                .or(env.data_path)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_REGISTRY)),
        )
    };

    let owner = match (owner.or(env.owner), &data_path) {
        (Some(owner), _) => owner,
        (None, Some(path)) => open_registry(path).await?.owner(),
        (None, None) => bail!("--owner (or UBB_OWNER_ADDRESS) is required with --in-memory"),
    };

    Ok(ApiConfig {
        owner,
        data_path,
        auto_save: env.auto_save.unwrap_or(0),
    })
}

/// Run API server
async fn cmd_serve(
    registry: Option<&Path>,
    port: u16,
    bind: &str,
    owner: Option<&str>,
    in_memory: bool,
) -> Result<()> {
    println!("{}", "🚀 Starting UBB registry API server...".cyan().bold());

    let owner = owner.map(parse_address).transpose()?;
    let env = EnvSettings::load().context("Invalid server environment")?;
    let config = serve_config(registry, owner, in_memory, env).await?;

    match &config.data_path {
        Some(path) => println!(
            "   {} {} (auto-save after {} pending writes)",
            "Storage:".dimmed(),
            path.display(),
            config.auto_save
        ),
        None => println!("   {} in-memory", "Storage:".dimmed()),
    }

    let server = ApiServer::from_config(config)
        .await
        .context("Failed to open registry for serving")?;

    let addr: SocketAddr = format!("{}:{}", bind, port).parse()?;
    println!("   {} http://{}", "Listening on:".green(), addr);
    println!("   {} http://{}/health", "Health check:".dimmed(), addr);
    println!("\n   Press Ctrl+C to stop.\n");

    server.run(addr).await?;
    Ok(())
}
