//! Chat message text.
//!
//! Templates use positional placeholders (`{0}`, `{1}`, ...). Everything the
//! resolution handler says to players is built here so the wording lives in
//! one place.

use crate::combat::AttackOutcome;

/// Channel a chat line is delivered on; clients color lines by kind.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ChatKind {
    YouHit,
    Missed,
    Spell,
    SpellResisted,
    System,
    Skill,
}

/// Substitutes `{n}` placeholders with `args[n]`.
///
/// Placeholders without a matching argument are left untouched.
pub fn format_template(template: &str, args: &[&str]) -> String {
    let mut out = String::with_capacity(template.len() + 16);
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let tail = &rest[open..];
        let substituted = tail.find('}').and_then(|close| {
            let index: usize = tail[1..close].parse().ok()?;
            let arg = args.get(index)?;
            Some((arg, close))
        });

        match substituted {
            Some((arg, close)) => {
                out.push_str(arg);
                rest = &tail[close + 1..];
            }
            None => {
                out.push('{');
                rest = &tail[1..];
            }
        }
    }

    out.push_str(rest);
    out
}

/// Formats the template and upper-cases the first letter.
pub fn make_sentence(template: &str, args: &[&str]) -> String {
    capitalize(&format_template(template, args))
}

pub fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

pub fn spell_no_effect(target: &str) -> String {
    format!("Your spell has no effect on the {target}!")
}

pub fn miss_to_caster(target: &str, combat_miss: bool) -> String {
    if combat_miss {
        format!("{target} is in combat and your bolt misses!")
    } else {
        "You miss!".to_string()
    }
}

pub fn miss_to_target(caster: &str) -> String {
    format!("{caster} missed!")
}

pub fn partial_block_to_target(caster: &str) -> String {
    format!("You partially block {caster}'s spell!")
}

pub fn full_block_to_target(caster: &str) -> String {
    format!("You block {caster}'s spell!")
}

pub fn block_to_caster(target: &str) -> String {
    format!("{} blocks!", capitalize(target))
}

pub fn engage_recently_attacked(engage_target: &str) -> String {
    format!(
        "{} has been attacked recently and you are unable to engage.",
        capitalize(engage_target)
    )
}

pub const ENGAGE_CONCENTRATE: &str = "You concentrate on blocking the blow!";

/// Damage report lines for the caster: the hit line and, if any, the crit line.
pub fn damage_report(target: &str, outcome: &AttackOutcome) -> Vec<String> {
    let modifier = match outcome.modifier {
        0 => String::new(),
        m if m > 0 => format!(" (+{m})"),
        m => format!(" ({m})"),
    };

    let mut lines = vec![format!(
        "You hit {target} for {}{modifier} damage!",
        outcome.damage
    )];
    if outcome.critical_damage > 0 {
        lines.push(format!(
            "You critically hit for an additional {} damage!",
            outcome.critical_damage
        ));
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn template_substitution() {
        assert_eq!(
            format_template("{0} is hit by a bolt of runic energy!", &["the goblin"]),
            "the goblin is hit by a bolt of runic energy!"
        );
        assert_eq!(format_template("{1} and {0}", &["a", "b"]), "b and a");
    }

    #[test]
    fn unmatched_placeholders_are_kept() {
        assert_eq!(format_template("{2} {x} {", &["a"]), "{2} {x} {");
    }

    #[test]
    fn sentence_is_capitalized() {
        assert_eq!(
            make_sentence("{0} is hit!", &["the goblin"]),
            "The goblin is hit!"
        );
    }

    #[test]
    fn miss_wording_differs_for_combat_miss() {
        assert_eq!(miss_to_caster("aldric", false), "You miss!");
        // the name is used as-is, unlike the block line
        assert_eq!(
            miss_to_caster("aldric", true),
            "aldric is in combat and your bolt misses!"
        );
        assert_eq!(block_to_caster("aldric"), "Aldric blocks!");
    }
}
