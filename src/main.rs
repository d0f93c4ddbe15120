use std::{fs::File, io::{self, BufRead, BufWriter, Write}, path::{Path, PathBuf}, process::ExitCode, time::Instant};

use clap::Parser;
use word_tally::{
    ingest::{corpus::HttpCorpus, export::ExportSource, source::{Author, Message, MessageSource}},
    ingest_all, Command, Config, Responder, WordStore,
};

/// Word counts for a chat history export.
///
/// Lines starting with `!` are commands (`!count`, `!count <target>`,
/// `!count <target> <word>`, `!emoji [top|bottom] [n]`); any other line is
/// counted as a live message from the `stdin` user.
#[derive(Parser, Debug)]
#[command(name = "word-tally", version)]
struct Args {
    /// JSON export with guilds, channels and messages
    #[arg(long)]
    export: PathBuf,

    /// Do not fetch the external corpus
    #[arg(long)]
    no_corpus: bool,

    /// Guild used for emoji queries (default: first guild of the export)
    #[arg(long)]
    guild: Option<u64>,

    /// Answer a single command and exit
    #[arg(long)]
    query: Option<String>,

    /// Write all tables as JSON after ingestion
    #[arg(long)]
    dump: Option<PathBuf>,
}

const LIVE_USER: &str = "stdin";

fn main() -> ExitCode {
    dotenv::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let config = Config::from_env();

    let source = match ExportSource::open(&args.export) {
        Ok(source) => source,
        Err(e) => {
            log::error!("error opening export {}: {}", args.export.display(), e);
            return ExitCode::FAILURE;
        }
    };

    let corpus = match (&config.corpus_url, args.no_corpus) {
        (Some(url), false) => match HttpCorpus::new(url.clone()) {
            Ok(corpus) => Some(corpus),
            Err(e) => {
                log::warn!("corpus disabled: {e}");
                None
            }
        },
        _ => None,
    };

    let mut store = WordStore::new();
    let load_start = Instant::now();
    log::info!("Building data...");
    match ingest_all(&mut store, &source, corpus.as_ref(), &config) {
        Ok(report) => log::info!(
            "Finished building data in {:.2}s: {} groups, {} channels ({} skipped, {} abandoned), {} messages, {} commands skipped, {} corpus lines",
            load_start.elapsed().as_secs_f64(),
            store.group_num(),
            report.channels_fetched,
            report.channels_skipped,
            report.channels_abandoned.len(),
            report.messages_seen,
            report.commands_skipped,
            report.corpus_lines
        ),
        Err(e) => {
            log::error!("ingestion failed: {e}");
            return ExitCode::FAILURE;
        }
    }

    if let Some(path) = &args.dump {
        if let Err(e) = dump(&store, path) {
            log::error!("dump to {} failed: {}", path.display(), e);
        }
    }

    let guild_id = match args.guild {
        Some(id) => id,
        None => source.guilds().ok().and_then(|g| g.first().map(|g| g.id)).unwrap_or(0),
    };

    if let Some(line) = args.query {
        let responder = Responder::new(&store, &source, guild_id, &config);
        let Some(command) = Command::parse(&line) else {
            log::error!("not a command: {line:?}");
            return ExitCode::FAILURE;
        };
        return match responder.respond(&command) {
            Ok(reply) => {
                println!("{reply}");
                ExitCode::SUCCESS
            }
            Err(e) => {
                println!("{e}");
                ExitCode::FAILURE
            }
        };
    }

    run_interactive(&mut store, &source, guild_id, &config);
    ExitCode::SUCCESS
}

fn dump(store: &WordStore, path: &Path) -> io::Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(&mut writer, store)?;
    writer.flush()
}

fn run_interactive(store: &mut WordStore, source: &ExportSource, guild_id: u64, config: &Config) {
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let mut next_id = 0u64;
    loop {
        print!("> ");
        let _ = stdout.flush();
        let mut line = String::new();
        match stdin.lock().read_line(&mut line) {
            Ok(0) => break,
            Ok(_) => {}
            Err(e) => {
                log::error!("read error: {e}");
                break;
            }
        }
        let line = line.trim_end_matches(&['\r', '\n'][..]);
        if line.is_empty() {
            continue;
        }

        match Command::parse(line) {
            Some(command) => {
                let responder = Responder::new(store, source, guild_id, config);
                match responder.respond(&command) {
                    Ok(reply) => println!("{reply}"),
                    Err(e) => println!("{e}"),
                }
            }
            None => {
                next_id += 1;
                let message = Message {
                    id: next_id,
                    content: line.to_string(),
                    author: Author { username: LIVE_USER.to_string(), bot: false },
                };
                store.build_message(&message);
            }
        }
    }
    log::info!("bye");
}
