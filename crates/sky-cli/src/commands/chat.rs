use std::future::Future;
use std::io::Write as _;

use sky_chat::{ChatSession, DataSource, LanguageModel};
use sky_config::SkywatchConfig;
use sky_core::response::Response;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};

use crate::bootstrap;
use crate::cli::{GlobalFlags, OutputFormat};
use crate::output::render_response;
use crate::progress::Progress;

const BANNER: &str = "Skywatch: ask about space pictures, Mars rovers, asteroids or Earth from orbit.\nType 'exit' or 'quit' to leave.";

/// Handle `skywatch chat`.
pub async fn handle(config: &SkywatchConfig, flags: &GlobalFlags) -> anyhow::Result<()> {
    let mut session = bootstrap::session(config)?;

    let llm = bootstrap::llm_client(config)?;
    if let Err(error) = llm.ping().await {
        tracing::warn!(
            url = %config.llm.base_url,
            model = llm.model(),
            "language model is unreachable, answers will carry NASA facts only: {error}"
        );
    }

    if !flags.quiet {
        println!("{BANNER}");
    }

    let interrupt = async {
        if let Err(error) = tokio::signal::ctrl_c().await {
            tracing::warn!("cannot listen for Ctrl-C: {error}");
            std::future::pending::<()>().await;
        }
    };
    let stdin = BufReader::new(tokio::io::stdin());
    let answered = run_loop(&mut session, stdin, interrupt, flags.format).await?;
    tracing::debug!(answered, "chat finished");

    if !flags.quiet {
        println!("Goodbye!");
    }
    Ok(())
}

/// Answer one question per input line until `exit`/`quit`, EOF or `interrupt`.
///
/// `interrupt` is watched both while waiting for input and while a question
/// is being answered. Returns the number of questions answered.
async fn run_loop<S, M, R>(
    session: &mut ChatSession<S, M>,
    input: R,
    interrupt: impl Future<Output = ()>,
    format: OutputFormat,
) -> anyhow::Result<usize>
where
    S: DataSource,
    M: LanguageModel,
    R: AsyncBufRead + Unpin,
{
    tokio::pin!(interrupt);
    let mut lines = input.lines();
    let mut answered = 0;

    loop {
        print!("> ");
        let _ = std::io::stdout().flush();

        let line = tokio::select! {
            biased;

            () = &mut interrupt => {
                println!();
                break;
            }
            line = lines.next_line() => line,
        };

        let line = match line {
            Ok(Some(line)) => line,
            Ok(None) => break,
            Err(error) => {
                tracing::warn!("stdin read error: {error}");
                break;
            }
        };

        let query = line.trim();
        if query.is_empty() {
            continue;
        }
        if is_exit_command(query) {
            break;
        }

        tracing::debug!(query, "chat received line");
        let spinner = Progress::spinner("Thinking...");
        let response = tokio::select! {
            biased;

            () = &mut interrupt => {
                spinner.finish_clear();
                println!();
                break;
            }
            response = session.handle(query) => response,
        };
        spinner.finish_clear();
        answered += 1;

        if format == OutputFormat::Table {
            println!("{}", response.text);
            if let Some(note) = degraded_note(&response) {
                println!("({note})");
            }
        } else {
            println!("{}", render_response(&response, format)?);
        }
    }

    Ok(answered)
}

fn is_exit_command(input: &str) -> bool {
    matches!(input.to_ascii_lowercase().as_str(), "exit" | "quit")
}

fn degraded_note(response: &Response) -> Option<String> {
    if response.degraded.is_empty() {
        return None;
    }
    let parts = response
        .degraded
        .iter()
        .map(|d| format!("{}: {}", d.intent.label(), d.failure))
        .collect::<Vec<_>>();
    Some(format!("some NASA data was unavailable: {}", parts.join(", ")))
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use pretty_assertions::assert_eq;
    use sky_core::intent::{Intent, IntentKind};
    use sky_core::response::{Degradation, FailureKind};
    use sky_core::result::ApiResult;
    use sky_llm::LlmError;
    use sky_nasa::FetchError;

    use super::*;

    /// NASA never answers.
    struct Silent;

    impl DataSource for Silent {
        async fn fetch(&self, _intent: &Intent) -> Result<ApiResult, FetchError> {
            std::future::pending().await
        }
    }

    struct Canned;

    impl LanguageModel for Canned {
        async fn complete(
            &self,
            _content: &str,
            _system: Option<&str>,
        ) -> Result<String, LlmError> {
            Ok(String::from("Black holes are regions of collapsed matter."))
        }
    }

    fn session() -> ChatSession<Silent, Canned> {
        ChatSession::new(&SkywatchConfig::default(), Silent, Canned)
    }

    #[tokio::test]
    async fn loop_skips_blank_lines_and_stops_at_exit() {
        let input: &[u8] = b"   \nTell me about black holes\nexit\nTell me about quasars\n";
        let answered = run_loop(
            &mut session(),
            input,
            std::future::pending(),
            OutputFormat::Table,
        )
        .await
        .unwrap();
        assert_eq!(answered, 1);
    }

    #[tokio::test]
    async fn loop_stops_at_end_of_input() {
        let input: &[u8] = b"Tell me about black holes\n";
        let answered = run_loop(&mut session(), input, std::future::pending(), OutputFormat::Raw)
            .await
            .unwrap();
        assert_eq!(answered, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn interrupt_during_a_pending_answer_ends_the_loop() {
        let input: &[u8] =
            b"What is today's astronomy picture of the day?\nTell me about black holes\n";
        let interrupt = tokio::time::sleep(Duration::from_secs(1));
        let answered = run_loop(&mut session(), input, interrupt, OutputFormat::Table)
            .await
            .unwrap();
        assert_eq!(answered, 0);
    }

    #[test]
    fn exit_commands_ignore_case() {
        assert!(is_exit_command("exit"));
        assert!(is_exit_command("QUIT"));
        assert!(!is_exit_command("exit now"));
    }

    #[test]
    fn clean_response_has_no_note() {
        let response = Response::new("hi".into(), vec![IntentKind::Apod], Vec::new());
        assert_eq!(degraded_note(&response), None);
    }

    #[test]
    fn degraded_response_names_each_failure() {
        let response = Response::new(
            "partial".into(),
            vec![IntentKind::Apod],
            vec![
                Degradation {
                    intent: IntentKind::Neo,
                    failure: FailureKind::RateLimited,
                },
                Degradation {
                    intent: IntentKind::MarsRover,
                    failure: FailureKind::Empty,
                },
            ],
        );
        assert_eq!(
            degraded_note(&response).as_deref(),
            Some("some NASA data was unavailable: Near Earth Objects: rate_limited, Mars Rover: empty")
        );
    }
}
