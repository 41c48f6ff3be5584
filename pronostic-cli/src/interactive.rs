use std::io::{self, Write};

use anyhow::{Context, Result};
use pronostic_db::cache::StoreCache;

use crate::analysis::generator::Strategy;
use crate::config::Settings;
use crate::display;
use crate::session::Session;

#[derive(Debug, PartialEq)]
enum InteractiveCommand {
    Generate(Strategy),
    Stats,
    History,
    Reload,
    Quit,
}

fn parse_command(input: &str) -> Option<InteractiveCommand> {
    let input = input.trim().to_lowercase();
    if let Some(strategy) = Strategy::from_name(&input) {
        return Some(InteractiveCommand::Generate(strategy));
    }
    match input.as_str() {
        "1" | "2" | "3" => input
            .parse::<usize>()
            .ok()
            .map(|i| InteractiveCommand::Generate(Strategy::ALL[i - 1])),
        "4" | "stats" | "statistiques" => Some(InteractiveCommand::Stats),
        "5" | "historique" | "history" | "hist" => Some(InteractiveCommand::History),
        "6" | "recharger" | "reload" => Some(InteractiveCommand::Reload),
        "7" | "quitter" | "quit" | "q" | "exit" => Some(InteractiveCommand::Quit),
        _ => None,
    }
}

fn display_menu() {
    println!();
    println!("── Pronostics EuroMillions ──");
    println!("  1. frequence   🎯 Générer (numéros les plus sortis)");
    println!("  2. retard      🎯 Générer (numéros les moins sortis)");
    println!("  3. mixte       🎯 Générer (fréquents, sans le dernier tirage)");
    println!("  4. stats       Fréquences des boules et étoiles");
    println!("  5. historique  Derniers tirages");
    println!("  6. recharger   Relire le fichier CSV");
    println!("  7. quitter     Quitter");
    println!();
}

fn prompt(msg: &str) -> Result<String> {
    print!("{}", msg);
    io::stdout().flush()?;
    let mut input = String::new();
    let read = io::stdin()
        .read_line(&mut input)
        .context("Erreur de lecture")?;
    if read == 0 {
        anyhow::bail!("Fin de l'entrée standard");
    }
    Ok(input.trim().to_string())
}

pub fn run_interactive(
    cache: &mut StoreCache,
    settings: &Settings,
    mut session: Session,
) -> Result<()> {
    display::display_summary(&session, settings.top_balls, settings.top_stars);

    loop {
        display_menu();
        let input = match prompt("> ") {
            Ok(s) => s,
            Err(_) => break, // EOF / Ctrl+D
        };

        if input.is_empty() {
            continue;
        }

        match parse_command(&input) {
            Some(InteractiveCommand::Quit) => {
                println!("Au revoir !");
                break;
            }
            Some(InteractiveCommand::Generate(strategy)) => {
                let result = session.generate(strategy);
                display::display_grid(strategy, &result);
            }
            Some(InteractiveCommand::Stats) => {
                if let Err(e) = super::cmd_stats(&session, settings) {
                    println!("Erreur: {e:#}");
                }
            }
            Some(InteractiveCommand::History) => {
                if let Err(e) = super::cmd_history(&session, settings.history_rows) {
                    println!("Erreur: {e:#}");
                }
            }
            Some(InteractiveCommand::Reload) => {
                if !reload(cache, settings, &mut session)? {
                    break;
                }
            }
            None => {
                println!("Commande inconnue : '{}'. Tapez un numéro (1-7) ou un nom de commande.", input);
            }
        }
    }

    Ok(())
}

/// Relit le fichier source. `false` si plus aucun tirage n'est exploitable ;
/// une erreur de chargement remonte à l'appelant.
fn reload(cache: &mut StoreCache, settings: &Settings, session: &mut Session) -> Result<bool> {
    cache.invalidate();
    let Some(store) = super::open_store(cache, settings).context("Rechargement impossible")? else {
        return Ok(false);
    };
    session.reload(store);
    Ok(true)
}
