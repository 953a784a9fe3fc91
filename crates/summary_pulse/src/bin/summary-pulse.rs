use clap::{Parser, Subcommand};
use summary_pulse::{
    config::{DatastoreSettings, PipelineSettings, ServerSettings},
    server::{self, AppState},
    tracing::init_tracing_subscriber,
    types::PipelineState,
    ResultArchive, SaveRequest, SavedListing,
};
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;

#[derive(Parser)]
#[command(name = "summary-pulse", about = "Video transcript summarizer")]
struct Cli {
    #[command(flatten)]
    datastore: DatastoreSettings,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Serve the HTTP API
    Serve {
        #[command(flatten)]
        server: ServerSettings,

        #[command(flatten)]
        pipeline: PipelineSettings,
    },
    /// Summarize one video and exit
    Run {
        /// Video URL
        url: String,

        /// Save the result to the datastore
        #[arg(long)]
        save: bool,

        #[command(flatten)]
        pipeline: PipelineSettings,
    },
    /// Print saved results, most recent first
    List,
}

async fn run_once(
    pipeline: &PipelineSettings,
    datastore: &DatastoreSettings,
    url: &str,
    save: bool,
) -> anyhow::Result<()> {
    // datastore errors surface before any remote call
    let archive = if save {
        Some(ResultArchive::new(datastore.connect().await?))
    } else {
        None
    };
    let pipeline = pipeline.pipeline();

    let (tx, mut rx) = watch::channel(PipelineState::Idle);
    let progress = tokio::spawn(async move {
        while rx.changed().await.is_ok() {
            let state = *rx.borrow_and_update();
            eprintln!("[{state}]");
        }
    });

    let cancel = CancellationToken::new();
    let ctrl_c = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            ctrl_c.cancel();
        }
    });

    let result = pipeline.run(url, &tx, &cancel).await;
    drop(tx);
    let _ = progress.await;

    let output = result.map_err(|e| {
        let message = e.user_message();
        anyhow::Error::new(e).context(message)
    })?;
    println!("{}", serde_json::to_string_pretty(&output.summary)?);

    if let Some(archive) = archive {
        let saved = archive
            .save(SaveRequest {
                url: output.video.raw_url().to_string(),
                transcript: output.transcript.into_text(),
                summary: Some(output.summary),
            })
            .await?;
        eprintln!("Saved as #{}", saved.id);
    }

    Ok(())
}

async fn list_saved(datastore: &DatastoreSettings) -> anyhow::Result<()> {
    let archive = ResultArchive::new(datastore.connect().await?);

    match archive.list().await? {
        SavedListing::NoResults => println!("No saved results yet."),
        SavedListing::Results(results) => {
            for result in results {
                println!(
                    "#{} {} {}\n  {}",
                    result.id,
                    result.created_at.format("%Y-%m-%d %H:%M"),
                    result.url,
                    result.summary.summary
                );
            }
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    let _guard = sentry::init((
        std::env::var("SENTRY_DSN").unwrap_or_default(),
        sentry::ClientOptions {
            release: sentry::release_name!(),
            environment: Some("production".into()),
            ..Default::default()
        },
    ));

    let cli = Cli::parse();
    init_tracing_subscriber()?;

    match cli.command {
        Command::Serve { server, pipeline } => {
            let addr = server.socket_addr()?;
            let state = AppState::new(
                pipeline.pipeline(),
                ResultArchive::new(cli.datastore.connect().await?),
            );
            server::serve(addr, state).await?;
        }
        Command::Run {
            url,
            save,
            pipeline,
        } => run_once(&pipeline, &cli.datastore, &url, save).await?,
        Command::List => list_saved(&cli.datastore).await?,
    }

    Ok(())
}
