//! `loveos chat` — Interactive or single-message dialogue.

use std::io::Write;
use std::sync::Arc;

use loveos_config::AppConfig;
use loveos_core::generator::Generator;
use loveos_engine::{DualAwarenessEngine, DualGapResult};
use loveos_providers::ProviderGenerator;
use tokio::io::{self, AsyncBufRead, AsyncBufReadExt, BufReader};
use tracing::debug;

pub async fn run(message: Option<String>) -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;

    // Check credentials early for a clear error
    if let Err(e) = config.require_credentials() {
        eprintln!();
        eprintln!("  ERROR: {e}");
        eprintln!();
        eprintln!("  Set the key for your provider:");
        eprintln!("    OPENAI_API_KEY   = 'sk-...' (openai and compatible endpoints)");
        eprintln!("    GEMINI_API_KEY   = '...'   (with LOVEOS_PROVIDER=gemini)");
        eprintln!("    LOVEOS_API_KEY   = '...'   (fallback for any provider)");
        eprintln!();
        eprintln!("  Or add it to your config file:");
        eprintln!("    {}", AppConfig::config_dir().join("config.toml").display());
        eprintln!();
        return Err("No usable API key found. See above for setup instructions.".into());
    }

    let generator = ProviderGenerator::from_config(&config)
        .map_err(|e| format!("Failed to build generator: {e}"))?;
    let generator_name = generator.name().to_string();
    let generator: Arc<dyn Generator> = Arc::new(generator);
    let engine = DualAwarenessEngine::from_config(&config.engine, Some(generator));
    debug!(generator = %generator_name, options = ?engine.options(), "Engine ready");

    if let Some(msg) = message {
        // Single message mode
        let dual = engine.evaluate_dual(&msg).await;
        println!("{}", render_turn(&dual));
        return Ok(());
    }

    println!();
    println!("  ╔══════════════════════════════════════════════╗");
    println!("  ║        Love-OS — Resonance Dialogue          ║");
    println!("  ╚══════════════════════════════════════════════╝");
    println!();
    println!("  Generator: {generator_name}");
    println!("  Language:  {}", config.engine.language);
    println!(
        "  Voltage:   {}   Resistance: {}",
        config.engine.voltage, config.engine.base_resistance
    );
    println!();
    println!("  Type your message and press Enter.");
    println!("  Empty line, 'exit' or Ctrl+C to quit.");
    println!();

    let interrupt = async {
        let _ = tokio::signal::ctrl_c().await;
    };
    let end = session(
        &engine,
        BufReader::new(io::stdin()),
        interrupt,
        &mut std::io::stdout(),
    )
    .await?;
    debug!(?end, "Chat session ended");

    println!();
    println!("  Goodbye.");
    println!();

    Ok(())
}

/// Why an interactive session stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SessionEnd {
    /// Empty line, `exit` or `quit`.
    Exit,
    /// Input closed (Ctrl+D).
    EndOfInput,
    /// `interrupt` fired, either while waiting for input or mid-turn.
    Interrupted,
}

/// Read lines from `input` and answer each one until an exit line, end of
/// input, or `interrupt` completes.
///
/// The line is handed to the engine exactly as typed.
pub(crate) async fn session<R, I, W>(
    engine: &DualAwarenessEngine,
    input: R,
    interrupt: I,
    out: &mut W,
) -> std::io::Result<SessionEnd>
where
    R: AsyncBufRead + Unpin,
    I: Future<Output = ()>,
    W: Write,
{
    tokio::pin!(interrupt);
    let mut lines = input.lines();

    loop {
        write!(out, "  You > ")?;
        out.flush()?;

        let line = tokio::select! {
            line = lines.next_line() => line?,
            () = &mut interrupt => return Ok(SessionEnd::Interrupted),
        };

        let Some(line) = line else {
            return Ok(SessionEnd::EndOfInput);
        };
        if is_exit(&line) {
            return Ok(SessionEnd::Exit);
        }

        eprint!("  ...");
        let dual = tokio::select! {
            dual = engine.evaluate_dual(&line) => dual,
            () = &mut interrupt => {
                eprint!("\r     \r");
                return Ok(SessionEnd::Interrupted);
            }
        };
        eprint!("\r     \r");

        writeln!(out)?;
        writeln!(out, "{}", render_turn(&dual))?;
        writeln!(out)?;
    }
}

/// Lines that end the interactive session: an empty line, or `exit`/`quit`
/// in any case with surrounding whitespace ignored.
pub(crate) fn is_exit(line: &str) -> bool {
    let word = line.trim();
    line.is_empty() || word.eq_ignore_ascii_case("exit") || word.eq_ignore_ascii_case("quit")
}

/// The status line followed by the response, prefixed per line.
pub(crate) fn render_turn(dual: &DualGapResult) -> String {
    let mut out = format!("  [Status] {}", dual.policy_note());
    for line in dual.response().lines() {
        out.push_str("\n  Love-OS > ");
        out.push_str(line);
    }
    out
}
