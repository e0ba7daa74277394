use serde::{Deserialize, Serialize};

/// One of the five scored personality trait categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Dimension {
    NegativeSensitivity,
    Extraversion,
    OpennessToExperience,
    Agreeableness,
    Conscientiousness,
}

impl Dimension {
    pub const ALL: [Dimension; 5] = [
        Dimension::NegativeSensitivity,
        Dimension::Extraversion,
        Dimension::OpennessToExperience,
        Dimension::Agreeableness,
        Dimension::Conscientiousness,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Dimension::NegativeSensitivity => "Negative Sensitivity",
            Dimension::Extraversion => "Extraversion",
            Dimension::OpennessToExperience => "Openness to Experience",
            Dimension::Agreeableness => "Agreeableness",
            Dimension::Conscientiousness => "Conscientiousness",
        }
    }
}

/// A single Likert-scale questionnaire item. `reversed` items are phrased
/// against the grain of their dimension and score as `6 - response`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Statement {
    pub id: u32,
    pub text: &'static str,
    pub dimension: Dimension,
    pub reversed: bool,
}

pub const ITEMS_PER_DIMENSION: usize = 12;

macro_rules! stmt {
    ($id:expr, $text:expr, $dim:ident) => {
        Statement {
            id: $id,
            text: $text,
            dimension: Dimension::$dim,
            reversed: false,
        }
    };
    ($id:expr, $text:expr, $dim:ident, rev) => {
        Statement {
            id: $id,
            text: $text,
            dimension: Dimension::$dim,
            reversed: true,
        }
    };
}

// 60-item revision: 12 statements per dimension, ids stable across revisions.
static CATALOG: [Statement; 60] = [
    // Negative Sensitivity
    stmt!(1, "I often worry that things are about to go wrong.", NegativeSensitivity),
    stmt!(2, "People say I lose my temper quickly.", NegativeSensitivity),
    stmt!(3, "I become discouraged under stress.", NegativeSensitivity),
    stmt!(4, "In a group I worry about looking foolish.", NegativeSensitivity),
    stmt!(5, "I blame myself when things go badly.", NegativeSensitivity),
    stmt!(6, "I act on impulse and regret it afterwards.", NegativeSensitivity),
    stmt!(7, "I stay calm in tense situations.", NegativeSensitivity, rev),
    stmt!(8, "Small setbacks can spoil my whole day.", NegativeSensitivity),
    stmt!(9, "I rarely feel anxious without a concrete reason.", NegativeSensitivity, rev),
    stmt!(10, "Criticism stays on my mind for a long time.", NegativeSensitivity),
    stmt!(11, "I recover quickly after a disappointment.", NegativeSensitivity, rev),
    stmt!(12, "I often feel tense before important events.", NegativeSensitivity),
    // Extraversion
    stmt!(13, "I am a cheerful, high-spirited person.", Extraversion),
    stmt!(14, "I prefer being with other people to being alone.", Extraversion),
    stmt!(15, "I enjoy lively, colourful places.", Extraversion),
    stmt!(16, "I take a genuine interest in the people I work with.", Extraversion),
    stmt!(17, "I speak up for my views even against opposition.", Extraversion),
    stmt!(18, "I keep myself busy and on the move.", Extraversion),
    stmt!(19, "I find long conversations with strangers draining.", Extraversion, rev),
    stmt!(20, "I like to be where the action is.", Extraversion),
    stmt!(21, "I usually let others take the lead in a group.", Extraversion, rev),
    stmt!(22, "I laugh easily and often.", Extraversion),
    stmt!(23, "I would rather spend an evening quietly at home.", Extraversion, rev),
    stmt!(24, "Meeting new people gives me energy.", Extraversion),
    // Openness to Experience
    stmt!(25, "Standards of right and wrong are not the same for everyone.", OpennessToExperience),
    stmt!(26, "I pay close attention to my feelings about things.", OpennessToExperience),
    stmt!(27, "I enjoy working through intricate puzzles.", OpennessToExperience),
    stmt!(28, "I like to let my imagination roam freely.", OpennessToExperience),
    stmt!(29, "Nature and works of art fascinate me.", OpennessToExperience),
    stmt!(30, "I enjoy picking up new hobbies and skills.", OpennessToExperience),
    stmt!(31, "I prefer familiar routines to trying something new.", OpennessToExperience, rev),
    stmt!(32, "Abstract ideas hold little interest for me.", OpennessToExperience, rev),
    stmt!(33, "I like to question assumptions that others take for granted.", OpennessToExperience),
    stmt!(34, "Poetry and music can move me deeply.", OpennessToExperience),
    stmt!(35, "I seldom daydream.", OpennessToExperience, rev),
    stmt!(36, "I am curious about cultures different from my own.", OpennessToExperience),
    // Agreeableness
    stmt!(37, "I do not boast about myself or my achievements.", Agreeableness),
    stmt!(38, "I go out of my way to help people in need.", Agreeableness),
    stmt!(39, "I assume most people mean well.", Agreeableness),
    stmt!(40, "I forgive others easily.", Agreeableness),
    stmt!(41, "I try to be courteous to everyone I meet.", Agreeableness),
    stmt!(42, "I would rather cooperate than compete.", Agreeableness),
    stmt!(43, "I can be sharp and dismissive when annoyed.", Agreeableness, rev),
    stmt!(44, "I suspect that people who are friendly want something from me.", Agreeableness, rev),
    stmt!(45, "I am considerate of other people's feelings.", Agreeableness),
    stmt!(46, "I argue until I get my way.", Agreeableness, rev),
    stmt!(47, "I enjoy doing small favours without being asked.", Agreeableness),
    stmt!(48, "I find it hard to admit when I am wrong.", Agreeableness, rev),
    // Conscientiousness
    stmt!(49, "I keep my belongings neat and in order.", Conscientiousness),
    stmt!(50, "I finish what I start, even when it gets tedious.", Conscientiousness),
    stmt!(51, "I set clear goals and work toward them step by step.", Conscientiousness),
    stmt!(52, "People can rely on me to be on time.", Conscientiousness),
    stmt!(53, "I think carefully before making a decision.", Conscientiousness),
    stmt!(54, "I hold myself to high standards of work.", Conscientiousness),
    stmt!(55, "I put off unpleasant tasks for as long as I can.", Conscientiousness, rev),
    stmt!(56, "My workspace tends to end up in a mess.", Conscientiousness, rev),
    stmt!(57, "I plan ahead rather than improvise.", Conscientiousness),
    stmt!(58, "I sometimes leave tasks half finished.", Conscientiousness, rev),
    stmt!(59, "I double-check my work for mistakes.", Conscientiousness),
    stmt!(60, "I follow the rules even when no one is watching.", Conscientiousness),
];

/// The fixed statement bank. Immutable for the lifetime of the process;
/// scoring always runs over this catalog, never over the shuffled
/// presentation order.
pub fn catalog() -> &'static [Statement] {
    &CATALOG
}

pub fn statement_by_id(id: u32) -> Option<&'static Statement> {
    CATALOG.iter().find(|s| s.id == id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    #[test]
    fn catalog_has_twelve_items_per_dimension() {
        for dim in Dimension::ALL {
            let count = catalog().iter().filter(|s| s.dimension == dim).count();
            assert_eq!(count, ITEMS_PER_DIMENSION, "{:?}", dim);
        }
    }

    #[test]
    fn catalog_ids_are_unique() {
        let ids: BTreeSet<u32> = catalog().iter().map(|s| s.id).collect();
        assert_eq!(ids.len(), catalog().len());
    }

    #[test]
    fn every_dimension_has_reversed_items() {
        for dim in Dimension::ALL {
            assert!(
                catalog()
                    .iter()
                    .any(|s| s.dimension == dim && s.reversed),
                "{:?} has no reversed items",
                dim
            );
        }
    }

    #[test]
    fn statement_lookup_by_id() {
        assert_eq!(statement_by_id(1).map(|s| s.dimension), Some(Dimension::NegativeSensitivity));
        assert!(statement_by_id(0).is_none());
        assert!(statement_by_id(61).is_none());
    }
}
