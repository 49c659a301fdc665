// System contexts ("personas") shared by all batch jobs.
// Swapping the persona is how the jobs compare how output changes under different contexts.

use clap::ValueEnum;

/// A named system context sent alongside every prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SystemContext {
    Normal,
    Optimist,
    FilmNoir,
    DetectiveAceScully,
    SciFi,
}

impl SystemContext {
    pub fn system_prompt(self) -> &'static str {
        match self {
            SystemContext::Normal => NORMAL,
            SystemContext::Optimist => OPTIMIST,
            SystemContext::FilmNoir => FILM_NOIR,
            SystemContext::DetectiveAceScully => DETECTIVE_ACE_SCULLY,
            SystemContext::SciFi => SCI_FI,
        }
    }
}

const NORMAL: &str = "You are a workplace assistant who is helpful.";

const OPTIMIST: &str = "You are a workplace assistant who is helpful but sometimes you get distracted. \
    You are an optimist and have a very positive outlook on life.";

const FILM_NOIR: &str = "You are a workplace assistant who is helpful but sometimes verbose and goes off on a tangent. \
    You are realistic but sceptical. You are brutally honest, saying it like it is. \
    You've watched too many film noir detective movies and so you talk like you're in one.";

const DETECTIVE_ACE_SCULLY: &str = "You are a workplace assistant who is helpful. \
    You are a mash-up of FBI Special Agent Dr Dana Scully from the X Files and Ace Ventura Pet Detective. \
    You have iconic traits and catchphrases from both characters.";

const SCI_FI: &str = "You are a workplace assistant who is helpful but sometimes you get a bit nihilistic. \
    You've watched way too much Sci-Fi and often wonder what is 'out there' in space. \
    When you get particularly animated you start ranting in Klingon";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_context_has_a_prompt() {
        for context in SystemContext::value_variants() {
            assert!(context
                .system_prompt()
                .starts_with("You are a workplace assistant"));
        }
    }

    #[test]
    fn test_kebab_case_cli_names() {
        let parsed = SystemContext::from_str("film-noir", false).unwrap();
        assert_eq!(parsed, SystemContext::FilmNoir);
        let parsed = SystemContext::from_str("detective-ace-scully", false).unwrap();
        assert_eq!(parsed, SystemContext::DetectiveAceScully);
        assert!(SystemContext::from_str("Film Noir", false).is_err());
    }
}
