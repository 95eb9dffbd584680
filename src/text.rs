//! Reply text for every player-visible game event.
//!
//! Flavored events draw one line from a small pool so back-to-back games do
//! not read like a broken record. Placeholders are substituted after the
//! draw; every variant in a pool carries the same placeholders.

use std::time::Duration;

use rand::seq::IndexedRandom;

const LOADED: &[&str] = &[
    "🔫 {name} loads {count} rounds and spins the cylinder!\n💀 Six chambers, one fate.\n⚡ {timeout} seconds on the clock!",
    "🔫 {count} rounds click into the cylinder, courtesy of {name}.\n💀 Six chambers, one fate.\n⚡ The table folds after {timeout} quiet seconds!",
];

const ALREADY_IN_PROGRESS: &[&str] = &[
    "💥 {name}, the game is still on!",
    "💥 Hold it, {name}! This round is not finished yet.",
];

const NEED_ADMIN: &[&str] = &[
    "😏 {name}, you are not an admin; the revolver takes no orders from you.",
    "😏 Nice try, {name}, but that move is reserved for admins.",
];

const HIT: &[&str] = &[
    "💥 The shot rings out!\n😱 {name} goes down!\n🔇 Muted for {seconds} seconds...",
    "💥 Bang! {name} caught a live one!\n🔇 {seconds} seconds of silence, courtesy of the house.",
];

const HIT_IMMUNE: &[&str] = &[
    "💥 The shot rings out!\n😎 {name} flashes a badge; the house dares not mute its own.",
    "💥 Bang! {name} is hit, but rank has its privileges. No mute today.",
];

const HIT_UNPUNISHED: &[&str] = &[
    "💥 Bang! {name} goes down, but the mute jammed. Count yourself lucky.",
    "💥 {name} caught a live one, yet the gag never arrived. The house owes you one.",
];

const MISS: &[&str] = &[
    "🎲 Click! An empty chamber!\n😅 {name} lives to gamble another round.",
    "🎲 Click. Nothing. {name} exhales slowly.",
];

const EXHAUSTED: &[&str] = &[
    "🏁 That was the last round. Game over!\n🔄 Another?",
    "🏁 The cylinder is spent. Game over!\n🔄 Load it up again?",
];

const NO_GAME: &[&str] = &[
    "⚠️ {name}, the gun is empty! Nothing to fire.",
    "⚠️ Easy, {name}. Nobody has loaded the revolver yet.",
];

const TIMEOUT: &[&str] = &[
    "⏰ The table went quiet and the game folded itself.\n🔄 Load again whenever you are ready.",
    "⏰ Nobody pulled the trigger in time. The revolver goes back in the drawer.",
];

const MISFIRE: &[&str] = &[
    "💥 Bang! The revolver went off on its own!\n😱 {name} is hit!\n🔇 Muted for {seconds} seconds...",
    "💥 A misfire! The gun on the table had other plans.\n😱 {name} takes the hit and {seconds} seconds of silence.",
];

const MISFIRE_IMMUNE: &[&str] = &[
    "💥 The revolver went off on its own!\n😎 {name} was in the line of fire, but rank kept the mute away.",
];

const MISFIRE_UNPUNISHED: &[&str] = &[
    "💥 A misfire catches {name}, but the mute never lands. Spooky and harmless.",
];

fn pick(pool: &[&str]) -> String {
    pool.choose(&mut rand::rng())
        .copied()
        .unwrap_or_default()
        .to_owned()
}

/// Notice that the command only works in group chats.
pub fn group_only() -> String {
    "❌ Group chats only.".to_owned()
}

/// Announcement for a freshly loaded cylinder.
pub fn loaded(name: &str, count: u8, timeout_secs: u64) -> String {
    pick(LOADED)
        .replace("{name}", name)
        .replace("{count}", &count.to_string())
        .replace("{timeout}", &timeout_secs.to_string())
}

/// Refusal to load while a game is running.
pub fn already_in_progress(name: &str) -> String {
    pick(ALREADY_IN_PROGRESS).replace("{name}", name)
}

/// Refusal of an admin-only move.
pub fn need_admin(name: &str) -> String {
    pick(NEED_ADMIN).replace("{name}", name)
}

/// Refusal of an explicit bullet count, with a pointer at the random load
/// anyone may use.
pub fn need_admin_for_count(name: &str) -> String {
    let mut line = need_admin(name);
    line.push_str("\n💡 Plain /load works for everyone.");
    line
}

/// Refusal of a bullet count outside the cylinder's capacity.
pub fn invalid_count(name: &str) -> String {
    format!("❌ {name}, the cylinder holds 1 to 6 rounds. Pick a number in range.")
}

/// A live round found the shooter.
pub fn hit(name: &str, muted_for: Duration) -> String {
    pick(HIT)
        .replace("{name}", name)
        .replace("{seconds}", &muted_for.as_secs().to_string())
}

/// A live round found a shooter the house cannot mute.
pub fn hit_immune(name: &str) -> String {
    pick(HIT_IMMUNE).replace("{name}", name)
}

/// A live round found the shooter but the mute could not be delivered.
pub fn hit_unpunished(name: &str) -> String {
    pick(HIT_UNPUNISHED).replace("{name}", name)
}

/// An empty chamber.
pub fn miss(name: &str) -> String {
    pick(MISS).replace("{name}", name)
}

/// Tail line appended when the final round has been fired.
pub fn exhausted() -> String {
    pick(EXHAUSTED)
}

/// Firing with no game running.
pub fn no_game(name: &str) -> String {
    pick(NO_GAME).replace("{name}", name)
}

/// Asking for status with no game running.
pub fn no_game_status() -> String {
    "🔍 No game running.\n💡 /load starts one.".to_owned()
}

/// Status report for a running game. Chamber numbers are one-based for
/// humans; the original cylinder indexes from zero.
pub fn status(remaining: usize, chamber_index: usize, current_is_live: bool) -> String {
    let verdict = if current_is_live {
        "🎯 A live round is waiting"
    } else {
        "🍀 Safe"
    };
    format!(
        "🔫 Game in progress\n📊 Rounds left: {remaining}\n🎯 Chamber up next: #{number}\n{verdict}",
        number = chamber_index + 1,
    )
}

/// Announcement that an idle game dissolved itself.
pub fn timeout_notice() -> String {
    pick(TIMEOUT)
}

/// The revolver went off on its own and muted the sender.
pub fn misfire(name: &str, muted_for: Duration) -> String {
    pick(MISFIRE)
        .replace("{name}", name)
        .replace("{seconds}", &muted_for.as_secs().to_string())
}

/// The revolver went off on its own at someone the house cannot mute.
pub fn misfire_immune(name: &str) -> String {
    pick(MISFIRE_IMMUNE).replace("{name}", name)
}

/// The revolver went off on its own but the mute could not be delivered.
pub fn misfire_unpunished(name: &str) -> String {
    pick(MISFIRE_UNPUNISHED).replace("{name}", name)
}

/// Confirmation after toggling the misfire feature.
pub fn misfire_toggled(enabled: bool) -> String {
    if enabled {
        "🔥 Random misfire is ON! Any message might be the loud one.".to_owned()
    } else {
        "💤 Random misfire is OFF.".to_owned()
    }
}

/// Command reference and house rules.
pub fn help() -> String {
    "🔫 Revolver Duel\n\
     \n\
     Player commands:\n\
     /load - load 1 to 6 random rounds\n\
     /fire - pull the trigger\n\
     /status - check the running game\n\
     /help - this message\n\
     \n\
     Admin commands:\n\
     /load <count> - load an exact number of rounds\n\
     /misfire on - enable random misfires\n\
     /misfire off - disable random misfires\n\
     \n\
     Or just say it: \"let's play revolver roulette\" starts a game,\n\
     \"count me in\" pulls the trigger, \"how's the game going\" asks for status.\n\
     \n\
     House rules:\n\
     - six chambers, rounds placed at random\n\
     - a hit mutes the shooter for a random stretch\n\
     - an idle game folds itself after the timeout"
        .to_owned()
}

/// Catch-all apology for an unexpected internal failure.
pub fn failure() -> String {
    "❌ Something went wrong. Try again.".to_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_placeholders(pool: &[&str], placeholders: &[&str]) {
        for variant in pool {
            for placeholder in placeholders {
                assert!(
                    variant.contains(placeholder),
                    "variant {variant:?} is missing {placeholder}"
                );
            }
        }
    }

    #[test]
    fn every_variant_carries_its_placeholders() {
        assert_placeholders(LOADED, &["{name}", "{count}", "{timeout}"]);
        assert_placeholders(ALREADY_IN_PROGRESS, &["{name}"]);
        assert_placeholders(NEED_ADMIN, &["{name}"]);
        assert_placeholders(HIT, &["{name}", "{seconds}"]);
        assert_placeholders(HIT_IMMUNE, &["{name}"]);
        assert_placeholders(HIT_UNPUNISHED, &["{name}"]);
        assert_placeholders(MISS, &["{name}"]);
        assert_placeholders(NO_GAME, &["{name}"]);
        assert_placeholders(MISFIRE, &["{name}", "{seconds}"]);
        assert_placeholders(MISFIRE_IMMUNE, &["{name}"]);
        assert_placeholders(MISFIRE_UNPUNISHED, &["{name}"]);
    }

    #[test]
    fn substitution_leaves_no_braces_behind() {
        let line = loaded("Sam", 3, 120);
        assert!(line.contains("Sam"));
        assert!(line.contains('3'));
        assert!(line.contains("120"));
        assert!(!line.contains('{'), "unsubstituted placeholder in {line:?}");

        let line = hit("Sam", Duration::from_secs(61));
        assert!(line.contains("Sam"));
        assert!(line.contains("61"));
        assert!(!line.contains('{'));
    }

    #[test]
    fn status_numbers_chambers_from_one() {
        let line = status(2, 0, false);
        assert!(line.contains("Rounds left: 2"));
        assert!(line.contains("#1"));
        assert!(line.contains("Safe"));

        let line = status(1, 5, true);
        assert!(line.contains("#6"));
        assert!(line.contains("live round"));
    }

    #[test]
    fn help_lists_every_command() {
        let help = help();
        for command in ["/load", "/fire", "/status", "/help", "/misfire on", "/misfire off"] {
            assert!(help.contains(command), "help is missing {command}");
        }
    }
}
