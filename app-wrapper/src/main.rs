use app_wrapper::command::{tracing_init, HumanTaskCommand};
use clap::{Parser, Subcommand};
use human_task_base::{codec_config::CodecConfig, APP_NAME};
use human_task_infra::codec::DocumentFormat;
use std::io::Write;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Input format (json|yaml); detected from the content when omitted
    #[arg(long, short, global = true)]
    format: Option<DocumentFormat>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Decode a definition document and print its id
    Validate { file: PathBuf },
    /// Re-encode a definition document to stdout
    Convert {
        file: PathBuf,
        /// Output format (json|yaml)
        #[arg(long, short)]
        to: DocumentFormat,
    },
}

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_init();
    let args = Args::parse();
    let command = HumanTaskCommand::new(CodecConfig::from_env());

    let res = match args.command {
        Command::Validate { file } => command.validate(&file, args.format).map(|summary| {
            println!("{summary}");
        }),
        Command::Convert { file, to } => command
            .convert(&file, args.format, to)
            .and_then(|bytes| {
                let mut stdout = std::io::stdout().lock();
                stdout.write_all(&bytes)?;
                if !bytes.ends_with(b"\n") {
                    stdout.write_all(b"\n")?;
                }
                Ok(())
            }),
    };
    if let Err(e) = &res {
        tracing::error!("{} failed: {:#}", APP_NAME, e);
    }
    res
}
