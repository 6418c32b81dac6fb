//! Greedy autoplayer.
//!
//! Plays a game with a simple strategy: buy every affordable bonus, then
//! send the strongest units each turn. Useful for eyeballing balance.
//!
//! Usage:
//!   cargo run --bin autoplay -- [OPTIONS]
//!
//! Examples:
//!   cargo run --bin autoplay                      # 50 combats, seed 0
//!   cargo run --bin autoplay -- -c 200 --seed 7   # Longer reproducible run
//!   cargo run --bin autoplay -- --config rules.json --save

use std::env;
use std::path::PathBuf;

use guildmaster::core::{GameConfig, GameError, GameSession, JsonFileStore};
use guildmaster::shop::ShopOffer;
use guildmaster::units::UnitId;
use tracing_subscriber::EnvFilter;

struct Options {
    combats: u32,
    seed: u64,
    config: Option<PathBuf>,
    save: bool,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let args: Vec<String> = env::args().collect();
    let options = parse_args(&args);
    let config = match &options.config {
        Some(path) => GameConfig::load_or_default(path),
        None => GameConfig::default(),
    };

    println!("GuildMaster autoplay");
    println!("====================");
    println!("  Combats: {}", options.combats);
    println!("  Seed:    {}", options.seed);
    println!();

    let mut session = GameSession::seeded(config, options.seed);
    let mut played = 0;

    while played < options.combats && !session.state().game_completed {
        shop_greedily(&mut session);

        if session.start_combat(None).is_err() {
            break;
        }
        played += 1;
        if session.state().combat.is_sealed() {
            sell_cheapest_bonus(&mut session);
        }

        while session.state().combat.is_active {
            let squad = strongest_units(&session, session.state().config.max_selected);
            if session.resolve_turn(&squad).is_err() {
                break;
            }
        }
    }

    let state = session.state();
    println!();
    println!("Combats played: {}", played);
    println!("  Won:          {}", state.combats_won);
    println!("  Lost:         {}", state.combats_lost);
    println!("  Rank:         {}", state.rank);
    println!("  Gold:         {}", state.gold);
    println!("  Squad size:   {}", state.roster.len());
    println!("  Completed:    {}", state.game_completed);

    if options.save {
        let result = JsonFileStore::in_home_dir()
            .map_err(GameError::from)
            .and_then(|mut store| session.save(&mut store).map(|_| store));
        match result {
            Ok(store) => println!("Saved to {}", store.path().display()),
            Err(e) => eprintln!("Save failed: {}", e),
        }
    }
}

fn strongest_units(session: &GameSession, count: usize) -> Vec<UnitId> {
    let mut pool = session.combat_pool();
    pool.sort_by_key(|u| std::cmp::Reverse(u.power()));
    pool.iter().take(count).map(|u| u.id).collect()
}

/// Buys bonuses cheapest first, then units, while gold lasts.
fn shop_greedily(session: &mut GameSession) {
    let items = session.generate_shop();
    let mut order: Vec<usize> = (0..items.len()).collect();
    order.sort_by_key(|&i| {
        let unit_first = matches!(items[i].offer, ShopOffer::Unit { .. });
        (unit_first, items[i].price)
    });
    for slot in order {
        let item = &items[slot];
        if matches!(item.offer, ShopOffer::Consumable { .. }) || item.price > session.state().gold {
            continue;
        }
        let _ = session.purchase(slot);
    }
}

fn sell_cheapest_bonus(session: &mut GameSession) {
    let cheapest = session
        .state()
        .bonuses
        .copies
        .keys()
        .filter_map(|id| guildmaster::shop::bonus_price(id).map(|p| (p, id.clone())))
        .min();
    if let Some((_, id)) = cheapest {
        let _ = session.sell_bonus(&id);
    }
}

fn parse_args(args: &[String]) -> Options {
    let mut options = Options {
        combats: 50,
        seed: 0,
        config: None,
        save: false,
    };

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "-c" | "--combats" => {
                if i + 1 < args.len() {
                    options.combats = args[i + 1].parse().unwrap_or(50);
                    i += 1;
                }
            }
            "-s" | "--seed" => {
                if i + 1 < args.len() {
                    options.seed = args[i + 1].parse().unwrap_or(0);
                    i += 1;
                }
            }
            "--config" => {
                if i + 1 < args.len() {
                    options.config = Some(PathBuf::from(&args[i + 1]));
                    i += 1;
                }
            }
            "--save" => options.save = true,
            "-h" | "--help" => {
                println!("Usage: autoplay [-c COMBATS] [-s SEED] [--config FILE] [--save]");
                std::process::exit(0);
            }
            other => eprintln!("Ignoring unknown argument: {}", other),
        }
        i += 1;
    }
    options
}
