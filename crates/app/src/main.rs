use std::fmt;
use std::io::{BufRead, Write as _};
use std::str::FromStr;
use std::sync::Arc;

use quiz_core::catalog;
use quiz_core::model::{Answer, Question, QuestionKind, QuizMode};
use services::{Clock, QuizHistoryService, QuizLoopService, Shuffle, StatsService};
use storage::repository::Storage;

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    InvalidMode { raw: String },
    InvalidSeed { raw: String },
    InvalidLimit { raw: String },
    InvalidDbUrl { raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidMode { raw } => write!(f, "invalid --mode value: {raw}"),
            ArgsError::InvalidSeed { raw } => write!(f, "invalid --seed value: {raw}"),
            ArgsError::InvalidLimit { raw } => write!(f, "invalid --limit value: {raw}"),
            ArgsError::InvalidDbUrl { raw } => write!(f, "invalid --db value: {raw}"),
        }
    }
}

impl std::error::Error for ArgsError {}

fn require_value(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<String, ArgsError> {
    args.next().ok_or(ArgsError::MissingValue { flag })
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  cargo run -p app -- play    [--db <sqlite_url>] [--mode <recap|true-false>] [--seed <u64>]");
    eprintln!("  cargo run -p app -- history [--db <sqlite_url>] [--limit <n>]");
    eprintln!("  cargo run -p app -- seed    [--db <sqlite_url>]");
    eprintln!();
    eprintln!("Defaults:");
    eprintln!("  --db sqlite:dev.sqlite3");
    eprintln!("  --mode recap");
    eprintln!("  --limit 20");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  QUIZ_DB_URL, QUIZ_MODE");
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Play,
    History,
    Seed,
}

impl Command {
    fn from_arg(arg: &str) -> Option<Self> {
        match arg {
            "play" => Some(Self::Play),
            "history" => Some(Self::History),
            "seed" => Some(Self::Seed),
            _ => None,
        }
    }
}

struct Args {
    db_url: String,
    mode: QuizMode,
    shuffle: Shuffle,
    limit: u32,
}

impl Args {
    fn parse(args: &mut impl Iterator<Item = String>) -> Result<Self, ArgsError> {
        let mut db_url = std::env::var("QUIZ_DB_URL")
            .ok()
            .map_or_else(|| "sqlite://dev.sqlite3".into(), normalize_sqlite_url);
        let mut mode = std::env::var("QUIZ_MODE")
            .ok()
            .and_then(|value| QuizMode::from_str(&value).ok())
            .unwrap_or(QuizMode::Recap);
        let mut shuffle = Shuffle::Random;
        let mut limit = 20;

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--db" => {
                    let value = require_value(args, "--db")?;
                    if value.trim().is_empty() {
                        return Err(ArgsError::InvalidDbUrl { raw: value });
                    }
                    db_url = normalize_sqlite_url(value);
                }
                "--mode" => {
                    let value = require_value(args, "--mode")?;
                    mode = QuizMode::from_str(&value)
                        .map_err(|_| ArgsError::InvalidMode { raw: value })?;
                }
                "--seed" => {
                    let value = require_value(args, "--seed")?;
                    let seed: u64 = value
                        .parse()
                        .map_err(|_| ArgsError::InvalidSeed { raw: value.clone() })?;
                    shuffle = Shuffle::Seeded(seed);
                }
                "--limit" => {
                    let value = require_value(args, "--limit")?;
                    limit = value
                        .parse()
                        .map_err(|_| ArgsError::InvalidLimit { raw: value.clone() })?;
                }
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        Ok(Self {
            db_url,
            mode,
            shuffle,
            limit,
        })
    }
}

fn normalize_sqlite_url(raw: String) -> String {
    if raw == "sqlite::memory:" || raw.starts_with("sqlite://") {
        return raw;
    }

    let trimmed = raw.trim().to_string();
    let path_str = trimmed
        .strip_prefix("sqlite:")
        .unwrap_or(trimmed.as_str())
        .to_string();
    let path = std::path::Path::new(&path_str);
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .unwrap_or_else(|_| std::path::PathBuf::from("."))
            .join(path)
    };
    format!("sqlite://{}", absolute.display())
}

fn prepare_sqlite_file(db_url: &str) -> Result<(), Box<dyn std::error::Error>> {
    if db_url == "sqlite::memory:" {
        return Ok(());
    }

    let path = db_url
        .strip_prefix("sqlite://")
        .ok_or_else(|| ArgsError::InvalidDbUrl {
            raw: db_url.to_string(),
        })?;
    let path = path.split('?').next().unwrap_or(path);
    if path.is_empty() {
        return Err(ArgsError::InvalidDbUrl {
            raw: db_url.to_string(),
        }
        .into());
    }

    let path = std::path::Path::new(path);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    if !path.exists() {
        std::fs::OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(path)?;
    }

    Ok(())
}

/// Seed the built-in catalog when the database holds no questions yet, so
/// a fresh install is immediately playable.
async fn ensure_question_pool(storage: &Storage) -> Result<(), Box<dyn std::error::Error>> {
    for mode in [QuizMode::Recap, QuizMode::TrueFalse] {
        if !storage.questions.questions_for_mode(mode).await?.is_empty() {
            return Ok(());
        }
    }

    for question in catalog::default_questions()? {
        storage.questions.upsert_question(&question).await?;
    }
    log::info!("seeded built-in question catalog");
    Ok(())
}

fn read_line(input: &mut impl BufRead) -> Result<Option<String>, std::io::Error> {
    let mut line = String::new();
    let read = input.read_line(&mut line)?;
    if read == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
}

/// Map terminal input to an answer for the shown question. An empty line
/// is treated as no answer (scored like a timeout).
fn parse_answer(question: &Question, raw: &str) -> Option<Answer> {
    if raw.is_empty() {
        return None;
    }
    match question.kind() {
        QuestionKind::MultipleChoice { options, .. } => {
            let letter = raw.chars().next()?.to_ascii_uppercase();
            let index = (letter as usize).checked_sub('A' as usize)?;
            if index < options.len() {
                Some(Answer::Choice(index))
            } else {
                None
            }
        }
        QuestionKind::TrueFalse { .. } => match raw.to_lowercase().as_str() {
            "s" | "sant" | "j" | "ja" => Some(Answer::Bool(true)),
            "f" | "falskt" | "n" | "nej" => Some(Answer::Bool(false)),
            _ => None,
        },
    }
}

const OPTION_LETTERS: [char; 6] = ['A', 'B', 'C', 'D', 'E', 'F'];

fn option_letter(index: usize) -> char {
    OPTION_LETTERS.get(index).copied().unwrap_or('?')
}

fn print_question(question: &Question, number: usize, total: u32, seconds: u32) {
    println!();
    println!("Fråga {number} av {total}  [{}]", question.category());
    println!("{}", question.prompt());
    match question.kind() {
        QuestionKind::MultipleChoice { options, .. } => {
            for (index, option) in options.iter().enumerate() {
                println!("  {}. {option}", option_letter(index));
            }
            print!("Svar (A-{}): ", option_letter(options.len() - 1));
        }
        QuestionKind::TrueFalse { .. } => {
            print!("Sant eller falskt? (s/f, {seconds}s i appen): ");
        }
    }
    let _ = std::io::stdout().flush();
}

async fn play(args: &Args, storage: &Storage) -> Result<(), Box<dyn std::error::Error>> {
    ensure_question_pool(storage).await?;

    let loop_svc = QuizLoopService::new(
        Clock::default_clock(),
        Arc::clone(&storage.questions),
        Arc::clone(&storage.history),
    )
    .with_shuffle(args.shuffle);

    let mut session = loop_svc.start_session(args.mode).await?;
    println!("{} — {} frågor", args.mode.title(), session.total_questions());

    let stdin = std::io::stdin();
    let mut input = stdin.lock();

    while let Some(question) = session.current_question().cloned() {
        let number = session.answered_count() + 1;
        print_question(
            &question,
            number,
            session.total_questions(),
            session.time_left(),
        );

        let answer = match read_line(&mut input)? {
            Some(raw) => parse_answer(&question, &raw),
            None => None,
        };
        let outcome = session.submit_answer(answer)?.clone();

        if outcome.correct {
            if outcome.streak_bonus {
                println!("Rätt! {} i rad!", outcome.streak_after);
            } else {
                println!("Rätt!");
            }
        } else {
            match outcome.answer {
                None => println!("Inget svar!"),
                Some(_) => println!("Inte riktigt!"),
            }
            if let Some(correct) = question.correct_option() {
                println!("Rätt svar: {correct}");
            }
        }
        println!("Visste du att... {}", question.explanation());

        loop_svc.advance(&mut session).await?;
    }

    let history_id = loop_svc.finalize_entry(&mut session).await?;
    let entry = storage.history.get_entry(history_id).await?;
    let tier = entry.tier();

    println!();
    println!("{}", tier.headline());
    println!("{}", tier.message());
    println!(
        "Resultat: {}/{} ({}%)",
        entry.score(),
        entry.total(),
        entry.percentage()
    );
    if entry.streak() > 1 {
        println!("{} frågor i rad!", entry.streak());
    }

    let stats = StatsService::new(Arc::clone(&storage.history));
    let overview = stats.overview().await?;
    println!();
    println!(
        "Totalt {} quiz, bästa streak {}",
        overview.total_quizzes, overview.best_streak
    );
    for badge in stats.badges().await? {
        let marker = if badge.unlocked { "x" } else { " " };
        println!("  [{marker}] {} — {}", badge.kind.name(), badge.kind.requirement());
    }

    Ok(())
}

async fn history(args: &Args, storage: &Storage) -> Result<(), Box<dyn std::error::Error>> {
    let service = QuizHistoryService::new(Arc::clone(&storage.history));
    let items = service.recent(args.limit).await?;

    if items.is_empty() {
        println!("Ingen historik än.");
        return Ok(());
    }

    for item in items {
        let when = item.completed_at.format("%Y-%m-%d %H:%M");
        print!(
            "{when}  {:<12} {}/{} ({}%)",
            item.mode.title(),
            item.score,
            item.total,
            item.percentage
        );
        if item.streak > 1 {
            print!("  {} streak", item.streak);
        }
        println!();
    }

    Ok(())
}

async fn seed(storage: &Storage) -> Result<(), Box<dyn std::error::Error>> {
    let questions = catalog::default_questions()?;
    let count = questions.len();
    for question in &questions {
        storage.questions.upsert_question(question).await?;
    }
    println!("seeded {count} questions");
    Ok(())
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let mut argv: Vec<String> = std::env::args().skip(1).collect();

    // Default behavior: play when no subcommand is provided.
    let cmd = match argv.first().map(String::as_str) {
        None => Command::Play,
        Some("--help" | "-h") => {
            print_usage();
            return Ok(());
        }
        Some(first) if first.starts_with("--") => Command::Play,
        Some(first) => Command::from_arg(first).ok_or_else(|| {
            eprintln!("unknown subcommand: {first}");
            print_usage();
            std::io::Error::new(std::io::ErrorKind::InvalidInput, "unknown subcommand")
        })?,
    };

    if !argv.is_empty() && !argv[0].starts_with("--") {
        argv.remove(0);
    }

    let mut iter = argv.into_iter();
    let args = Args::parse(&mut iter).map_err(|e| {
        eprintln!("{e}");
        print_usage();
        e
    })?;

    // Open + migrate SQLite at startup. Keep this in the binary glue so
    // core/services stay pure.
    prepare_sqlite_file(&args.db_url)?;
    let storage = Storage::sqlite(&args.db_url).await?;

    match cmd {
        Command::Play => play(&args, &storage).await,
        Command::History => history(&args, &storage).await,
        Command::Seed => seed(&storage).await,
    }
}

#[tokio::main]
async fn main() {
    env_logger::init();
    if let Err(err) = run().await {
        // At this layer (binary glue), printing once is fine.
        eprintln!("{err}");
        std::process::exit(2);
    }
}
