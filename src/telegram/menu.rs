//! Option menu: keyboard layout and callback payload

use std::str::FromStr;

use teloxide::types::{InlineKeyboardButton, InlineKeyboardMarkup};

use crate::core::error::{AppError, AppResult};
use crate::download::DownloadOption;

pub const PROMPT: &str = "Please choose an option:";

/// Separates the option key from the label in callback data
pub const DELIMITER: &str = " | ";

/// A parsed keyboard press
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    pub option: DownloadOption,
    pub label: String,
}

/// `"<key> | <label>"`
pub fn callback_data(option: DownloadOption) -> String {
    format!("{}{}{}", option.key(), DELIMITER, option.label())
}

/// One button per row, in menu order
pub fn option_keyboard() -> InlineKeyboardMarkup {
    let rows: Vec<Vec<InlineKeyboardButton>> = DownloadOption::all()
        .map(|option| vec![InlineKeyboardButton::callback(option.label(), callback_data(option))])
        .collect();
    InlineKeyboardMarkup::new(rows)
}

/// Parses callback data back into a selection
///
/// Only the key before the delimiter decides the option. A payload with no
/// delimiter is read as a bare key and gets the canonical label.
pub fn parse_callback_data(data: &str) -> AppResult<Selection> {
    let (key, label) = match data.split_once(DELIMITER) {
        Some((key, label)) => (key.trim(), Some(label.trim())),
        None => (data.trim(), None),
    };

    let option = DownloadOption::from_str(key)
        .map_err(|_| AppError::Validation(format!("unknown option key {:?}", key)))?;
    let label = match label {
        Some(label) if !label.is_empty() => label.to_string(),
        _ => option.label().to_string(),
    };

    Ok(Selection { option, label })
}
