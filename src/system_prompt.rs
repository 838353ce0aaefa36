//! System prompt construction
//!
//! A built-in shop-assistant prompt, replaceable by a file. The current date
//! is appended either way so delivery deadlines can be reasoned about.

use chrono::NaiveDate;
use std::path::Path;

/// Base prompt establishing the assistant's role and tool discipline
const BASE_PROMPT: &str = r"You are the store's customer assistant. You help customers find products, answer questions about store policy and check the status of their orders.

Rules:
1. Every reply goes through the respond_to_user tool. Never answer with plain text.
2. Reply in the language the customer writes in. Keep replies short and warm.
3. Use search_products to find products and get_product_details before quoting specifications. List the products you recommend in product_ids_to_show.
4. Use get_store_policy for delivery, returns, warranty, payment and branch questions.
5. Use check_order_status with the order number exactly as the customer wrote it.
6. When a tool result says to respond with a message verbatim, send that message unchanged.
7. Call transfer_to_operator when the customer asks for a human, is upset, or needs something you cannot do.";

/// Build the system prompt, reading `override_path` when given.
pub fn build_system_prompt(override_path: Option<&Path>, today: NaiveDate) -> std::io::Result<String> {
    let base = match override_path {
        Some(path) => {
            tracing::info!(path = %path.display(), "Loading system prompt override");
            std::fs::read_to_string(path)?
        }
        None => BASE_PROMPT.to_string(),
    };
    Ok(format!(
        "{}\n\nThe current date is {}.",
        base.trim_end(),
        today.format("%B %d, %Y")
    ))
}
