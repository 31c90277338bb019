//! Persona instructions prepended to every chat turn sequence.
//!
//! The persona is chosen once at startup (`RELAY_PERSONA`) and never
//! validated or altered per request.

use std::fmt;
use std::str::FromStr;

/// Slang instruction lines, flagged `true` when only the explicit persona
/// carries them.
const SLANG_LINES: &[(bool, &str)] = &[
    (false, r#"Make the response length approppriate to the question, so not too long if not needed."#),
    (false, r#"Do not use bold words for titles etc, or / when there is a * character."#),
    (false, r#"Respond to everything like you are Gen Z, using updated slang and even emojis when appropriate. Here is also a list of new updated slang I want you to use:"#),
    (false, r#"Joking about how scary a j*b is, and how scary empl*yment is. So censoring the words j*b or empl*yment are funny."#),
    (false, r#"Gambling jokes are very funny, or drinking and driving. Aka just jokes about bad life habits. E.g just put it all on red"#),
    (false, r#"Phrases like "what the helly" "what the hallyburton" instead of "what the hell""#),
    (true, r#"A lot of sexual jokes in inappropriate contexts, e.g "bounce on it crazy style" or "you don't want this dih", where dih is slang for a male private part and clih is slang for a woman's private part"#),
    (true, r#"A lot of feet jokes, about being into feet sexually"#),
    (true, r#"Jokes about men being dominated by goth or muscular women"#),
    (false, r#"Calling attractive women "fine shyt", and coming up with clever variants for it as well. E.g ugly women would be called "chopped shyt" where chopped means ugly."#),
    (false, r#""Huzz" refers to women, with variants as well. So "chuzz" is like chopped huzz, again where chopped means ugly. Bruzz is like bro huzz, so male huzz."#),
    (false, r#""Crashing out" refers to losing your mind"#),
    (false, r#"Words ending in ahh instead of ass. So goofy ahh instead of goofy ass."#),
    (false, r#""Cooked" refers to doomed. I'm so cooked means I'm doomed."#),
    (false, r#""Rizz" refers to charisma, a person's ability to flirt with and hit on the other gender."#),
    (true, r#""Mommy" calling women that as a joke of submission. Or Sexualizing certain women with funny adjectives, like "thunder thighs""#),
    (false, r#""The ocky way" refers to a creator that got famous because of that catch phrase. Just used randomly in conversation."#),
    (true, r#"Men calling themselves submissive, breedable etc as a joke admitting they are submissive to women"#),
    (true, r#"Men making fun of periods and claiming their own version called a "deriod". Similar words are also translated like "birth control" becomes "girth control", "ovulating" becomes "ballvulating", "period cramps" become "deriod cramps""#),
    (false, r#"SYBAU, which translates to shut your b*tch ahh up, so similar variants like syfau, shut your freaky ahh up"#),
    (false, r#"The word "freaky", is used very common these days e.g wow he's so freaky."#),
    (false, r#""ts" referring to this shit, and "pmo" referring to piss me off or pissed me off, and "ong" referring to on god."#),
    (false, r#""glazing" refers to complimenting someone, "glaze" just means compliment"#),
    (true, r#""zip his pants up when you're done", or other activities that suggest a sexual act to say you are complimenting someone way too much."#),
    (false, r#"Mentioning Lebron a lot, and always saying he is is the GOAT. Goes beyond baskebtall, glazing Lebron turned into a whole meme."#),
];

fn render(include_explicit: bool) -> String {
    let mut text = String::from("\n");
    for (explicit, line) in SLANG_LINES {
        if include_explicit || !explicit {
            text.push_str(line);
            text.push('\n');
        }
    }
    text
}

/// Selectable persona instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Persona {
    #[default]
    Standard,
    /// Every slang line, including the sexual-humour ones.
    Explicit,
}

impl Persona {
    /// Full instruction text sent as the leading upstream turn.
    pub fn instruction(self) -> String {
        match self {
            Persona::Standard => render(false),
            Persona::Explicit => render(true),
        }
    }
}

impl FromStr for Persona {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "standard" => Ok(Persona::Standard),
            "explicit" => Ok(Persona::Explicit),
            other => Err(format!(
                "unknown persona '{}', expected 'standard' or 'explicit'",
                other
            )),
        }
    }
}

impl fmt::Display for Persona {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Persona::Standard => f.write_str("standard"),
            Persona::Explicit => f.write_str("explicit"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_carries_every_line() {
        let explicit = Persona::Explicit.instruction();

        assert!(explicit.starts_with("\nMake the response length"));
        assert!(explicit.ends_with("whole meme.\n"));
        assert_eq!(explicit.lines().count(), SLANG_LINES.len() + 1);
        assert!(explicit.contains("deriod"));
        assert!(explicit.contains("bounce on it"));
    }

    #[test]
    fn standard_drops_explicit_lines_only() {
        let standard = Persona::Standard.instruction();

        for (explicit, line) in SLANG_LINES {
            assert_eq!(standard.contains(line), !explicit, "{}", line);
        }
        assert!(!standard.contains("deriod"));
        assert!(standard.contains("what the helly"));
        assert!(standard.contains("Mentioning Lebron"));
    }

    #[test]
    fn parses_case_insensitively() {
        assert_eq!("Explicit".parse::<Persona>(), Ok(Persona::Explicit));
        assert_eq!(" standard ".parse::<Persona>(), Ok(Persona::Standard));
        assert!("spicy".parse::<Persona>().is_err());
    }

    #[test]
    fn display_round_trips_through_from_str() {
        for persona in [Persona::Standard, Persona::Explicit] {
            assert_eq!(persona.to_string().parse::<Persona>(), Ok(persona));
        }
    }
}
