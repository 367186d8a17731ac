//! Refactoring prompt construction.

use crate::models::{Prompt, MARKER};

const GUIDELINES: &[&str] = &[
    "Use modern design patterns (such as MVC, microservices, or clean architecture) suitable for this project.",
    "Ensure the code is modular, well-structured, and adheres to best practices for each programming language used.",
    "Provide clear separation of concerns, with appropriate use of classes, methods, and modules.",
    "Include error handling, input validation, and security best practices (e.g., sanitizing inputs, using prepared statements).",
    "Make sure the code is optimized for performance, removing any redundant or inefficient operations.",
    "Ensure compatibility with the latest versions of the frameworks or libraries used.",
    "Include comprehensive comments and documentation for each class, method, and module to ensure readability and maintainability.",
    "Output only code blocks using the format {marker}{filename} at the top of each block to indicate the file name.",
    "Provide test cases or suggest how the code can be tested to ensure robustness and reliability.",
    "Use clear, descriptive names for all variables, functions, and classes.",
];

/// Wrap cleaned source text in the fixed refactoring instructions.
pub fn build_prompt(cleaned: &str) -> Prompt {
    let mut text = String::new();
    text.push_str(
        "You are an expert software engineer and architect. Your task is to review and refactor the entire project code \
         provided below to achieve the highest standards of code quality, maintainability, scalability, and performance. \
         Please follow these guidelines:\n",
    );

    for (i, guideline) in GUIDELINES.iter().enumerate() {
        text.push_str(&format!(
            "{}. {}\n",
            i + 1,
            guideline.replace("{marker}", MARKER)
        ));
    }

    text.push_str(
        "\nReview the code and provide your output below, using only code blocks with no explanations:\n\n",
    );
    text.push_str(cleaned);

    Prompt {
        text,
        cleaned: cleaned.to_string(),
    }
}
