//! Reserved column names understood by the interpreter.

/// Header names with meaning to built-in commands and settings tables.
///
/// Any other header is still addressable by its text; these are the ones the
/// engine itself reads.
///
/// # Examples
///
/// ```
/// use hokusai_core::Column;
/// use std::str::FromStr;
///
/// assert_eq!(Column::Arg1.as_ref(), "Arg1");
/// assert_eq!(Column::from_str("Voice").unwrap(), Column::Voice);
/// ```
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    strum::Display,
    strum::AsRefStr,
    strum::EnumString,
)]
pub enum Column {
    /// Dispatch tag
    Command,
    /// First positional argument
    Arg1,
    /// Second positional argument
    Arg2,
    /// Third positional argument
    Arg3,
    /// Fourth positional argument
    Arg4,
    /// Fifth positional argument
    Arg5,
    /// Sixth positional argument (fade and wait times)
    Arg6,
    /// Body text
    Text,
    /// Voice clip file name
    Voice,
    /// Voice clip version
    VoiceVersion,
    /// Character key in settings tables
    CharacterName,
    /// Expression / pose key in settings tables
    Pattern,
    /// Name shown to the player
    NameText,
    /// Asset file name in settings tables
    FileName,
}
