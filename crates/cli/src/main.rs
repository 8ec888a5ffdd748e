//! `seektube` - process a YouTube video and ask questions about its transcript.

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use engine::{Command, Engine, Event, HttpQaBackend};
use qa_http::{BASE_URL_ENV, DEFAULT_BASE_URL, QaClientConfig, TIMEOUT_ENV};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

mod output;

use output::Format;

/// Command-line arguments for seektube
#[derive(Parser, Debug)]
#[command(name = "seektube")]
#[command(about = "Ask questions about a YouTube video and jump to the answers")]
#[command(version)]
struct Args {
    /// Base url of the question-answering service
    #[arg(long, global = true, env = BASE_URL_ENV, default_value = DEFAULT_BASE_URL)]
    api_url: String,

    /// Whole-request timeout in seconds (unbounded when unset)
    #[arg(
        long,
        global = true,
        env = TIMEOUT_ENV,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    timeout_secs: Option<u64>,

    /// Print one JSON object per result instead of text
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: CliCommand,
}

#[derive(Subcommand, Debug)]
enum CliCommand {
    /// Submit a video for transcript processing
    Process {
        /// YouTube video url
        url: String,
    },
    /// Process a video, then ask each question about it in order
    Ask {
        /// YouTube video url
        url: String,
        /// Questions to ask
        #[arg(required = true)]
        questions: Vec<String>,
    },
    /// Check that the service is reachable
    Health,
}

fn main() -> Result<()> {
    init_tracing();
    let args = Args::parse();
    let format = Format::from_flag(args.json);

    let config = client_config(&args.api_url, args.timeout_secs);
    let backend = HttpQaBackend::new(config).context("failed to set up service client")?;
    info!(base_url = %backend.config().base_url, "using service");

    match args.command {
        CliCommand::Health => {
            let health = backend.health().context("health check failed")?;
            println!("{}", output::health(format, &health));
            Ok(())
        }
        CliCommand::Process { url } => {
            let mut engine = Engine::new(backend);
            process(&mut engine, &url, format)
        }
        CliCommand::Ask { url, questions } => {
            let mut engine = Engine::new(backend);
            process(&mut engine, &url, format)?;
            ask_all(&mut engine, &questions, format)
        }
    }
}

fn process(engine: &mut Engine<HttpQaBackend>, url: &str, format: Format) -> Result<()> {
    let events = engine.handle_command(Command::Submit {
        url: url.to_owned(),
    })?;
    if let Some(error) = first_error(&events) {
        if format == Format::Json {
            println!("{}", output::ingest_failure(url.trim(), error));
        }
        bail!("{}", error.message);
    }

    let session = engine.session();
    let Some(video_id) = session.video_id() else {
        bail!("video url is empty");
    };
    println!(
        "{}",
        output::ready(format, session.source_url(), video_id, session.ingest_status())
    );
    Ok(())
}

fn ask_all(engine: &mut Engine<HttpQaBackend>, questions: &[String], format: Format) -> Result<()> {
    let mut failed = 0_usize;

    for question in questions {
        let events = engine.handle_command(Command::Ask {
            question: question.clone(),
        })?;
        if events.is_empty() {
            warn!(question, "skipping empty question");
            continue;
        }

        for event in &events {
            match event {
                Event::AnswerReady(rendered) => {
                    println!("{}", output::answer(format, question.trim(), rendered));
                }
                Event::Error(error) => {
                    failed += 1;
                    println!("{}", output::failure(format, question.trim(), error));
                }
                Event::SessionChanged(_) | Event::StaleResponseDiscarded { .. } => {}
            }
        }
    }

    if failed > 0 {
        bail!("{failed} of {} questions failed", questions.len());
    }
    Ok(())
}

/// Builds the client settings; a blank url falls back to the default service.
fn client_config(api_url: &str, timeout_secs: Option<u64>) -> QaClientConfig {
    let base_url = match api_url.trim() {
        "" => DEFAULT_BASE_URL,
        trimmed => trimmed,
    };
    QaClientConfig::default()
        .with_base_url(base_url)
        .with_timeout_secs(timeout_secs)
}

fn first_error(events: &[Event]) -> Option<&engine::SessionError> {
    events.iter().find_map(|event| match event {
        Event::Error(error) => Some(error),
        _ => None,
    })
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use qa_http::DEFAULT_BASE_URL;

    use super::{Args, CliCommand, client_config};

    #[test]
    fn ask_collects_every_question() {
        let args = Args::try_parse_from([
            "seektube",
            "--api-url",
            "http://localhost:8000",
            "ask",
            "https://youtu.be/abc123",
            "What happens?",
            "Who speaks?",
        ])
        .expect("valid arguments");

        assert_eq!(args.api_url, "http://localhost:8000");
        let CliCommand::Ask { url, questions } = args.command else {
            panic!("expected ask");
        };
        assert_eq!(url, "https://youtu.be/abc123");
        assert_eq!(questions, vec!["What happens?", "Who speaks?"]);
    }

    #[test]
    fn ask_requires_a_question() {
        let result = Args::try_parse_from(["seektube", "ask", "https://youtu.be/abc123"]);

        assert!(result.is_err());
    }

    #[test]
    fn blank_api_url_uses_default_service() {
        let config = client_config("   ", Some(30));

        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.timeout_secs, Some(30));
    }

    #[test]
    fn api_url_is_trimmed() {
        let config = client_config(" http://localhost:8000 ", None);

        assert_eq!(config.base_url, "http://localhost:8000");
    }

    #[test]
    fn zero_timeout_is_rejected() {
        let result = Args::try_parse_from(["seektube", "--timeout-secs", "0", "health"]);

        assert!(result.is_err());
    }

    #[test]
    fn json_flag_is_accepted_after_subcommand() {
        let args = Args::try_parse_from(["seektube", "process", "https://youtu.be/x", "--json"])
            .expect("valid arguments");

        assert!(args.json);
    }
}
