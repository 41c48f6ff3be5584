mod analysis;
mod config;
mod display;
mod interactive;
mod session;

use std::path::PathBuf;
use std::rc::Rc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use crate::analysis::generator::Strategy;
use crate::config::Settings;
use crate::session::Session;
use pronostic_db::cache::StoreCache;
use pronostic_db::models::NumberKind;
use pronostic_db::store::DrawRecordStore;

#[derive(Parser)]
#[command(name = "pronostic", about = "Pronostics EuroMillions à partir des tirages récents")]
struct Cli {
    /// Fichier CSV des tirages (séparateur ';')
    #[arg(short, long, global = true)]
    file: Option<PathBuf>,

    /// Fenêtre d'analyse en jours
    #[arg(short, long, global = true)]
    days: Option<u32>,

    /// Fichier de configuration JSON
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Seed pour la reproductibilité
    #[arg(long, global = true)]
    seed: Option<u64>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Afficher les fréquences des boules et des étoiles
    Stats,

    /// Lister les derniers tirages, du plus récent au plus ancien
    History {
        /// Nombre de tirages à afficher
        #[arg(short, long)]
        last: Option<usize>,
    },

    /// Générer des grilles
    Generate {
        /// Stratégie de génération
        #[arg(short, long, default_value = "frequent")]
        strategy: Strategy,

        /// Nombre de grilles
        #[arg(short = 'n', long, default_value = "1")]
        count: usize,
    },

    /// Mode interactif (par défaut)
    Interactive,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let mut settings = Settings::load(cli.config.as_deref())?;
    if let Some(file) = cli.file {
        settings.source = file;
    }
    if let Some(days) = cli.days {
        settings.retention_days = days;
    }

    let mut cache = StoreCache::new();
    let Some(mut session) = open_session(&mut cache, &settings, cli.seed)? else {
        return Ok(());
    };

    match cli.command.unwrap_or(Command::Interactive) {
        Command::Stats => cmd_stats(&session, &settings),
        Command::History { last } => cmd_history(&session, last.unwrap_or(settings.history_rows)),
        Command::Generate { strategy, count } => cmd_generate(&mut session, strategy, count),
        Command::Interactive => interactive::run_interactive(&mut cache, &settings, session),
    }
}

/// Charge les tirages et prépare la session. `None` si aucun tirage n'est exploitable.
fn open_session(cache: &mut StoreCache, settings: &Settings, seed: Option<u64>) -> Result<Option<Session>> {
    let session = open_store(cache, settings)?
        .map(|store| Session::new(store, settings.policy.clone(), seed));
    Ok(session)
}

/// Lit le fichier source à travers le cache. Une erreur de chargement est fatale ;
/// un fichier sans tirage exploitable donne `None` après avertissement.
pub(crate) fn open_store(cache: &mut StoreCache, settings: &Settings) -> Result<Option<Rc<DrawRecordStore>>> {
    let options = settings.load_options()?;
    let now = chrono::Local::now().naive_local();
    let store = cache
        .get_or_load(&settings.source, &options, now)
        .with_context(|| format!("Erreur chargement CSV {}", settings.source.display()))?;

    display::display_load_report(store.report());
    if store.is_empty() {
        log::warn!("Aucun tirage retenu dans {}", settings.source.display());
        display::display_empty_warning();
        return Ok(None);
    }

    Ok(Some(store))
}

fn cmd_stats(session: &Session, settings: &Settings) -> Result<()> {
    display::display_summary(session, settings.top_balls, settings.top_stars);
    for kind in [NumberKind::Balls, NumberKind::Stars] {
        display::display_frequencies(session.ranking(kind), kind, settings.retention_days);
    }
    Ok(())
}

fn cmd_history(session: &Session, last: usize) -> Result<()> {
    let history = session.history();
    let shown = history.len().min(last);
    display::display_history(&history[..shown]);
    Ok(())
}

fn cmd_generate(session: &mut Session, strategy: Strategy, count: usize) -> Result<()> {
    for _ in 0..count {
        let result = session.generate(strategy);
        display::display_grid(strategy, &result);
    }
    Ok(())
}
