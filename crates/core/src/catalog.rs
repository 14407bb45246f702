//! Built-in question pool.
//!
//! The app ships with a starter set of fact questions so a fresh database
//! can be seeded without any authoring step. The true/false set is large
//! enough to cover a full 10-question draw.

use crate::model::{Question, QuestionError, QuestionId, QuestionKind};

fn choice(
    id: u64,
    prompt: &str,
    options: &[&str],
    correct: usize,
    explanation: &str,
    category: &str,
) -> Result<Question, QuestionError> {
    Question::new(
        QuestionId::new(id),
        prompt,
        QuestionKind::MultipleChoice {
            options: options.iter().map(ToString::to_string).collect(),
            correct,
        },
        explanation,
        category,
    )
}

fn true_false(
    id: u64,
    prompt: &str,
    correct: bool,
    explanation: &str,
    category: &str,
) -> Result<Question, QuestionError> {
    Question::new(
        QuestionId::new(id),
        prompt,
        QuestionKind::TrueFalse { correct },
        explanation,
        category,
    )
}

/// Multiple-choice questions for the recap mode.
///
/// # Errors
///
/// Returns `QuestionError` if any built-in entry fails validation.
pub fn recap_questions() -> Result<Vec<Question>, QuestionError> {
    Ok(vec![
        choice(
            1,
            "What color is octopus blood?",
            &["Red", "Blue", "Green", "Purple"],
            1,
            "Octopuses have blue blood due to copper-based hemocyanin instead of iron-based hemoglobin.",
            "Marine Biology",
        )?,
        choice(
            2,
            "How long does honey last?",
            &["1 year", "10 years", "100 years", "Forever"],
            3,
            "Honey never spoils due to its low moisture content and acidic pH.",
            "Food Science",
        )?,
        choice(
            3,
            "What is a group of flamingos called?",
            &["Flock", "Flamboyance", "Colony", "Pride"],
            1,
            "A group of flamingos is called a 'flamboyance' - quite fitting for these colorful birds!",
            "Animals",
        )?,
        choice(
            4,
            "How much energy does your brain use?",
            &[
                "5% of body energy",
                "10% of body energy",
                "20% of body energy",
                "30% of body energy",
            ],
            2,
            "Your brain uses about 20% of your body's total energy despite weighing only 2% of your body weight.",
            "Human Body",
        )?,
        choice(
            5,
            "What shape is wombat poop?",
            &["Round", "Oval", "Cube", "Triangle"],
            2,
            "Wombat poop is cube-shaped due to varying elasticity in their intestines!",
            "Animals",
        )?,
        choice(
            6,
            "How many hearts does an octopus have?",
            &["One", "Two", "Three", "Four"],
            2,
            "Two hearts pump blood through the gills and a third serves the rest of the body.",
            "Marine Biology",
        )?,
        choice(
            7,
            "How many bones does an adult human have?",
            &["186", "206", "226", "246"],
            1,
            "Adults have 206 bones - babies are born with about 300 that fuse while growing.",
            "Human Body",
        )?,
        choice(
            8,
            "Which planet has the longest day?",
            &["Mercury", "Venus", "Mars", "Jupiter"],
            1,
            "One rotation of Venus takes 243 Earth days - longer than its year of 225 days.",
            "Space",
        )?,
    ])
}

/// True/false statements for the faster-paced mode.
///
/// # Errors
///
/// Returns `QuestionError` if any built-in entry fails validation.
pub fn true_false_questions() -> Result<Vec<Question>, QuestionError> {
    Ok(vec![
        true_false(
            101,
            "Bananas are technically berries.",
            true,
            "Botanically, bananas are berries because they develop from a single flower and have seeds inside.",
            "Botany",
        )?,
        true_false(
            102,
            "The Great Wall of China is visible from space.",
            false,
            "This is a common myth. The Great Wall is not visible from space with the naked eye.",
            "History",
        )?,
        true_false(
            103,
            "A single cloud can weigh more than a million pounds.",
            true,
            "Clouds can weigh millions of pounds! The water droplets are just very spread out.",
            "Weather",
        )?,
        true_false(
            104,
            "Strawberries are berries.",
            false,
            "Strawberries are not true berries - they're aggregate fruits. Their seeds are on the outside!",
            "Botany",
        )?,
        true_false(
            105,
            "The shortest war in history lasted less than an hour.",
            true,
            "The Anglo-Zanzibar War lasted only 38-45 minutes in 1896!",
            "History",
        )?,
        true_false(
            106,
            "Sharks existed before trees.",
            true,
            "Sharks appeared around 450 million years ago, roughly 60 million years before the first trees.",
            "Nature",
        )?,
        true_false(
            107,
            "Goldfish only have a three-second memory.",
            false,
            "Goldfish can remember things for months and can even be trained to run mazes.",
            "Animals",
        )?,
        true_false(
            108,
            "Humans share about 60% of their DNA with bananas.",
            true,
            "Many basic cell-housekeeping genes are shared across all life, bananas included.",
            "Science",
        )?,
        true_false(
            109,
            "Lightning never strikes the same place twice.",
            false,
            "Tall structures are struck repeatedly - the Empire State Building gets hit about 25 times a year.",
            "Weather",
        )?,
        true_false(
            110,
            "Hot water can freeze faster than cold water.",
            true,
            "Known as the Mpemba effect, hot water can under some conditions freeze before cold water.",
            "Science",
        )?,
        true_false(
            111,
            "An ostrich's eye is bigger than its brain.",
            true,
            "An ostrich eye is about 5 cm across, larger than its walnut-sized brain.",
            "Animals",
        )?,
        true_false(
            112,
            "Bats are blind.",
            false,
            "All bats can see - echolocation is an addition to eyesight, not a replacement.",
            "Animals",
        )?,
    ])
}

/// The complete built-in pool across both modes.
///
/// # Errors
///
/// Returns `QuestionError` if any built-in entry fails validation.
pub fn default_questions() -> Result<Vec<Question>, QuestionError> {
    let mut questions = recap_questions()?;
    questions.extend(true_false_questions()?);
    Ok(questions)
}
