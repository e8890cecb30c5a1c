//! Prompt templates sent to the linguistic model

/// Asks for a JSON object with the definition and part of speech
const DEFINITION_FORMAT: &str = r#"Return answer in JSON format. Here is format: {"definition": "", "part_of_speech": ""}."#;

/// Asks for a JSON list of sentences
const EXAMPLES_FORMAT: &str =
    r#"Return answer in JSON format as list of sentences. Here is format: ["sentence_1", "sentence_2"]."#;

/// Prompt for a learner-friendly definition of `word`
pub fn word_definition(word: &str) -> String {
    format!(
        "You are an assistant helping English learners.
Define the word or phrase: '{word}' in clear and simple English.
Return plain text only. Do not include any explanations, examples, markdown, numbering, or titles.
Max length of the answer is 512 symbols.
Answer must not be too short. It must give an English learner an understanding of the word's meaning.
{DEFINITION_FORMAT}"
    )
}

/// Prompt for `count` example sentences using `word`
pub fn word_examples(word: &str, count: usize) -> String {
    format!(
        "You are an assistant helping English learners.
Return exactly {count} example sentences showing how the word or phrase '{word}' is used.
Do not explain them. Do not include markdown or extra text. Sentences should not be too short.
They must give the user a great example to understand usage of the word or phrase in different contexts.
The sentences MUST include the given word or phrase.
{EXAMPLES_FORMAT}"
    )
}

/// Prompt for a four-option multiple choice question about `word`
///
/// The reply format is what [`parse_quiz`](super::parser::parse_quiz) reads.
pub fn word_quiz(word: &str) -> String {
    format!(
        "Create a multiple choice quiz question for the word '{word}'.
Return in the following format:
Question: What does the word '{word}' mean?
Options:
- option A
- option B
- option C
- option D
Correct Answer: option A

Do not include any explanations or formatting like markdown."
    )
}
