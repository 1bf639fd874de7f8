use clap::Parser;
use ghost_migrate::application::{inspect, WordPressMigrationService, WriteAsMigrationService};
use ghost_migrate::cli::{format_post_list, format_report, Cli, Commands};
use ghost_migrate::error::Result;
use ghost_migrate::infrastructure::config::{WordPressArgs, WriteAsArgs};
use ghost_migrate::infrastructure::{
    read_export, Config, HttpWriteAs, OfflineWriteAs, PostStore, XmlRpcClient,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() {
    let cli = Cli::parse();

    init_tracing(cli.verbose);

    match run(cli) {
        Ok(_) => std::process::exit(0),
        Err(e) => {
            eprintln!("Error: {}", e.display_with_suggestions());
            std::process::exit(e.exit_code());
        }
    }
}

/// Log to stderr; RUST_LOG overrides the level picked by --verbose
fn init_tracing(verbose: bool) {
    let default_filter = if verbose {
        "debug,reqwest=info,hyper=info"
    } else {
        "info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Inspect { file } => {
            let export = read_export(&file)?;
            print!("{}", format_post_list(&inspect(&export)));
            Ok(())
        }
        Commands::Wordpress {
            file,
            endpoint,
            username,
            password,
            blog_id,
            tag_policy,
        } => {
            let config = Config::discover(cli.config.as_deref())?;
            let settings = config.wordpress_settings(WordPressArgs {
                endpoint,
                username,
                password,
                blog_id,
                tag_policy,
            })?;

            // Read before touching the remote site so a bad file fails fast
            let export = read_export(&file)?;

            let client = XmlRpcClient::new(settings.options)?;
            let service = WordPressMigrationService::new(client, settings.tag_policy);
            let report = service.execute(&export)?;

            print!("{}", format_report(&report));
            Ok(())
        }
        Commands::Writeas {
            file,
            blog,
            user,
            password,
            output_dir,
            delay,
            base_url,
            dry_run,
        } => {
            let config = Config::discover(cli.config.as_deref())?;
            let mut settings = config.writeas_settings(WriteAsArgs {
                publication: blog,
                username: user,
                password,
                base_url,
                output_dir,
                delay_secs: delay,
                dry_run,
            })?;

            let export = read_export(&file)?;
            let store = PostStore::new(settings.output_dir.clone());

            let report = if settings.dry_run {
                settings.post_delay = std::time::Duration::ZERO;
                WriteAsMigrationService::new(OfflineWriteAs, store, settings).execute(&export)?
            } else {
                let api = HttpWriteAs::new(&settings.base_url)?;
                WriteAsMigrationService::new(api, store, settings).execute(&export)?
            };

            print!("{}", format_report(&report));
            Ok(())
        }
    }
}
