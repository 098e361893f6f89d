use rand::seq::SliceRandom;
use rand::Rng;

const COIN_FACES: [&str; 2] = ["Heads", "Tails"];

/// Upper bound on dice per roll; larger requests are clamped, not rejected.
const MAX_DICE: u32 = 20;
/// Upper bound on sides per die. Lower bound is 2: a one-sided die is not a roll.
const MAX_SIDES: u32 = 1000;

const ROLL_USAGE: &str = "Invalid format. Use /roll, /roll 20, or /roll NdM, e.g. 2d6";

const HELP_TEXT: &str = "\
👋 Hi! I'm a simple dice bot.\n\
\n\
Commands:\n\
• /flip – flip a coin\n\
• /coin – same as /flip\n\
• /roll – roll a six-sided die\n\
• /roll NdM – e.g. 2d6, 1d20\n\
• /help – show this message";

/// Commands recognized from the first token of a message.
#[derive(Debug)]
enum Command {
    Start,
    Help,
    Flip,
    Roll { arg: String },
    /// Leading slash but not one of ours.
    Unknown,
}

/// Pure dispatcher: message text in, optional reply text out.
///
/// Non-command text returns `None` so the bot stays silent in group-chat
/// conversation; an unrecognized `/command` gets a short hint instead.
/// The caller owns the send side effect.
pub fn dispatch<R: Rng>(text: &str, rng: &mut R) -> Option<String> {
    let reply = match parse(text)? {
        Command::Start | Command::Help => HELP_TEXT.to_string(),
        Command::Flip => {
            let face = COIN_FACES.choose(rng).copied().unwrap_or(COIN_FACES[0]);
            format!("🪙 {face}")
        }
        Command::Roll { arg } => match parse_roll_arg(&arg) {
            Ok((count, sides)) => roll_reply(count, sides, rng),
            Err(usage) => format!("❌ {usage}"),
        },
        Command::Unknown => "🤖 Unknown command. Type /help".to_string(),
    };
    Some(reply)
}

/// Match the first whitespace-delimited token, case-insensitively, with any
/// group-chat mention suffix (`/roll@SomeBot`) stripped. Returns `None` for
/// text that is not a command at all.
fn parse(text: &str) -> Option<Command> {
    let text = text.trim();
    let first = text.split_whitespace().next()?;
    if !first.starts_with('/') {
        return None;
    }

    let name = match first.split_once('@') {
        Some((name, _mention)) => name,
        None => first,
    }
    .to_lowercase();

    let command = match name.as_str() {
        "/start" => Command::Start,
        "/help" => Command::Help,
        "/flip" | "/coin" => Command::Flip,
        // The argument keeps its original text; parse_roll_arg normalizes it.
        "/roll" => Command::Roll {
            arg: text[first.len()..].trim().to_string(),
        },
        _ => Command::Unknown,
    };
    Some(command)
}

/// Dice expression grammar: empty means 1d6, a bare integer `M` means 1dM,
/// and `NdM` (case-insensitive) means N dice of M sides. N and M are clamped
/// to sane bounds rather than rejected.
fn parse_roll_arg(arg: &str) -> Result<(u32, u32), &'static str> {
    let arg = arg.trim().to_lowercase();
    if arg.is_empty() {
        return Ok(clamp_dice(1, 6));
    }
    if let Ok(sides) = arg.parse::<u32>() {
        return Ok(clamp_dice(1, sides));
    }

    let (count, sides) = arg.split_once('d').ok_or(ROLL_USAGE)?;
    let count = count.parse::<u32>().map_err(|_| ROLL_USAGE)?;
    let sides = sides.parse::<u32>().map_err(|_| ROLL_USAGE)?;
    Ok(clamp_dice(count, sides))
}

fn clamp_dice(count: u32, sides: u32) -> (u32, u32) {
    (count.clamp(1, MAX_DICE), sides.clamp(2, MAX_SIDES))
}

fn roll_reply<R: Rng>(count: u32, sides: u32, rng: &mut R) -> String {
    let rolls: Vec<u32> = (0..count).map(|_| rng.gen_range(1..=sides)).collect();
    if count == 1 {
        format!("🎲 d{sides} → {}", rolls[0])
    } else {
        let total: u32 = rolls.iter().sum();
        format!("🎲 {count}d{sides} → {rolls:?} = {total}")
    }
}
