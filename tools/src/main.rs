//! desk-runner: command-line front end for the complaint desk.
//!
//! Usage:
//!   desk-runner --db complaints.db submit --title T --description D --name N --email E
//!               [--category utilities] [--location L] [--phone P]
//!   desk-runner --db complaints.db list [--search S] [--urgency high] [--status pending]
//!               [--category health] [--sort urgency|date|predicted]
//!   desk-runner --db complaints.db stats
//!   desk-runner --db complaints.db track CMP-7KQ2
//!   desk-runner --db complaints.db status <id> in_progress
//!   desk-runner --config desk.json --ipc-mode

use anyhow::{anyhow, bail, Result};
use complaint_desk_core::{
    analytics::Stats,
    config::DeskConfig,
    timeline::{timeline, TimelineStep},
    types::{Category, ComplaintStatus},
    Complaint, ComplaintDesk, ComplaintDraft, DeskResult, QueryParams,
};
use std::env;
use std::io::{self, BufRead, Write};

#[derive(serde::Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum IpcCommand {
    Submit { draft: ComplaintDraft },
    Query {
        #[serde(default)]
        params: QueryParams,
    },
    Stats,
    Track { query: String },
    UpdateStatus { id: String, status: ComplaintStatus },
    Quit,
}

#[derive(serde::Serialize)]
struct TrackView {
    complaint: Option<Complaint>,
    timeline:  Option<[TimelineStep; 4]>,
}

impl TrackView {
    fn new(complaint: Option<Complaint>) -> Self {
        let timeline = complaint.as_ref().map(|c| timeline(c.status));
        Self { complaint, timeline }
    }
}

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().skip(1).collect();
    let ipc_mode = args.iter().any(|a| a == "--ipc-mode");

    let mut config = match flag_value(&args, "--config") {
        Some(path) => DeskConfig::load(path)?,
        None => DeskConfig::default(),
    };
    if let Some(db) = flag_value(&args, "--db") {
        config.database_path = db.to_string();
    }

    log::info!("opening complaint store at {}", config.database_path);
    let mut desk = ComplaintDesk::open(config)?;

    if ipc_mode {
        return run_ipc_loop(&mut desk);
    }

    let positional = positionals(&args);
    let Some((command, rest)) = positional.split_first() else {
        bail!("missing command (submit, list, stats, track, status)");
    };

    match command.as_str() {
        "submit" => {
            let complaint = desk.submit(draft_from_args(&args)?)?;
            println!("Complaint submitted.");
            println!("  tracking id:  {}", complaint.tracking_id);
            print_complaint(&complaint);
        }
        "list" => {
            let params = params_from_args(&args)?;
            let view = desk.dashboard(&params)?;
            if view.is_empty() {
                println!("No complaints match.");
            }
            for c in &view {
                println!(
                    "{:<14} {:<9} {:<12} {:<15} {:>3}d  {}",
                    c.tracking_id,
                    c.urgency.label(),
                    c.status.label(),
                    c.category.label(),
                    c.predicted_resolution_days,
                    c.title,
                );
            }
        }
        "stats" => print_stats(&desk.analytics()?),
        "track" => {
            let query = rest.first().ok_or_else(|| anyhow!("track needs a tracking id"))?;
            match desk.track(query)? {
                Some(c) => {
                    print_complaint(&c);
                    println!();
                    for step in timeline(c.status) {
                        println!("  [{:?}] {}: {}", step.state, step.label, step.description);
                    }
                }
                None => println!("No complaint found for '{query}'."),
            }
        }
        "status" => {
            let [id, status] = rest else {
                bail!("usage: status <id> <pending|in_progress|resolved>");
            };
            let updated = desk.update_status(id, status.parse()?)?;
            println!("{} is now {}", updated.tracking_id, updated.status.label());
        }
        other => bail!("unknown command '{other}'"),
    }
    Ok(())
}

fn run_ipc_loop(desk: &mut ComplaintDesk) -> Result<()> {
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let mut handle = stdin.lock();
    let mut buffer = String::new();

    loop {
        buffer.clear();
        let bytes_read = handle.read_line(&mut buffer)?;
        if bytes_read == 0 {
            break; // EOF
        }
        if buffer.trim().is_empty() {
            continue;
        }

        let cmd: IpcCommand = match serde_json::from_str(&buffer) {
            Ok(c) => c,
            Err(e) => {
                write_error(&mut stdout, &e.to_string())?;
                continue;
            }
        };

        let response = match cmd {
            IpcCommand::Quit => break,
            IpcCommand::Submit { draft } => desk.submit(draft).map(|c| serde_json::to_value(c)),
            IpcCommand::Query { params } => desk.dashboard(&params).map(|v| serde_json::to_value(v)),
            IpcCommand::Stats => desk.analytics().map(|s| serde_json::to_value(s)),
            IpcCommand::Track { query } => desk
                .track(&query)
                .map(|c| serde_json::to_value(TrackView::new(c))),
            IpcCommand::UpdateStatus { id, status } => desk
                .update_status(&id, status)
                .map(|c| serde_json::to_value(c)),
        };

        write_response(&mut stdout, response)?;
    }
    Ok(())
}

/// One reply line per command. Command and serialization failures both
/// become `{"error": ...}` lines; the loop keeps running.
fn write_response(
    out: &mut impl Write,
    response: DeskResult<serde_json::Result<serde_json::Value>>,
) -> Result<()> {
    match response {
        Ok(Ok(value)) => writeln!(out, "{value}")?,
        Ok(Err(e)) => {
            log::warn!("ipc response not serializable: {e}");
            write_error(out, &e.to_string())?;
        }
        Err(e) => {
            log::warn!("ipc command failed: {e}");
            write_error(out, &e.to_string())?;
        }
    }
    out.flush()?;
    Ok(())
}

fn write_error(out: &mut impl Write, message: &str) -> Result<()> {
    let err_json = serde_json::json!({ "error": message });
    writeln!(out, "{err_json}")?;
    out.flush()?;
    Ok(())
}

fn draft_from_args(args: &[String]) -> Result<ComplaintDraft> {
    let required = |flag: &str| {
        flag_value(args, flag)
            .map(str::to_string)
            .ok_or_else(|| anyhow!("submit needs {flag}"))
    };
    let category = match flag_value(args, "--category") {
        Some(c) => c.parse()?,
        None => Category::default(),
    };
    Ok(ComplaintDraft {
        title: required("--title")?,
        description: required("--description")?,
        category,
        location: flag_value(args, "--location").map(str::to_string),
        citizen_name: required("--name")?,
        citizen_email: required("--email")?,
        citizen_phone: flag_value(args, "--phone").map(str::to_string),
    })
}

fn params_from_args(args: &[String]) -> Result<QueryParams> {
    let mut params = QueryParams::default();
    if let Some(s) = flag_value(args, "--search") {
        params.search = s.to_string();
    }
    if let Some(u) = flag_value(args, "--urgency") {
        params.urgency = u.parse()?;
    }
    if let Some(s) = flag_value(args, "--status") {
        params.status = s.parse()?;
    }
    if let Some(c) = flag_value(args, "--category") {
        params.category = c.parse()?;
    }
    if let Some(s) = flag_value(args, "--sort") {
        params.sort_by = s.parse()?;
    }
    Ok(params)
}

fn print_complaint(c: &Complaint) {
    println!("  title:        {}", c.title);
    println!("  status:       {}", c.status.label());
    println!("  urgency:      {}", c.urgency.label());
    println!("  category:     {}", c.category.description());
    if let Some(loc) = &c.location {
        println!("  location:     {loc}");
    }
    println!("  department:   {}", c.ai_suggested_department.as_deref().unwrap_or("-"));
    println!("  reason:       {}", c.ai_urgency_reason.as_deref().unwrap_or("-"));
    println!("  predicted:    {} day(s)", c.predicted_resolution_days);
    println!("  submitted:    {}", c.created_at.format("%b %-d, %H:%M"));
    if let Some(at) = c.resolved_at {
        println!("  resolved:     {}", at.format("%b %-d, %H:%M"));
    }
}

fn print_stats(stats: &Stats) {
    println!("=== COMPLAINT ANALYTICS ===");
    println!("  total:           {}", stats.total);
    println!("  pending:         {}", stats.pending);
    println!("  in progress:     {}", stats.in_progress);
    println!("  resolved:        {}", stats.resolved);
    println!("  critical:        {}", stats.critical);
    println!("  resolution rate: {}%", stats.resolution_rate_label());
    println!("  avg resolution:  {} days", stats.avg_resolution_days);

    println!();
    println!("=== BY CATEGORY ===");
    if stats.by_category.is_empty() {
        println!("  (no complaints yet)");
    }
    for e in &stats.by_category {
        println!("  {:<15} {}", e.name, e.value);
    }

    println!();
    println!("=== LAST {} DAYS ===", stats.daily.len());
    for d in &stats.daily {
        println!("  {:<7} submitted {:>3}  resolved {:>3}", d.label, d.submitted, d.resolved);
    }

    if !stats.recently_resolved.is_empty() {
        println!();
        println!("=== RECENTLY RESOLVED ===");
        for c in &stats.recently_resolved {
            println!("  {}  {}", c.tracking_id, c.title);
        }
    }
}

/// Value following `flag`, if present.
fn flag_value<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.windows(2)
        .find(|w| w[0] == flag)
        .map(|w| w[1].as_str())
}

/// Arguments that are neither flags nor flag values.
fn positionals(args: &[String]) -> Vec<String> {
    let mut out = Vec::new();
    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        if arg == "--ipc-mode" {
            continue;
        }
        if arg.starts_with("--") {
            iter.next();
            continue;
        }
        out.push(arg.clone());
    }
    out
}
