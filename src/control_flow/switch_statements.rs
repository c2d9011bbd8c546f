//! Example: `match` in place of switch statements

use std::any::Any;

pub fn day_kind(day: &str) -> &'static str {
    match day {
        "Monday" => "Start of the week",
        "Friday" => "End of the week",
        "Saturday" | "Sunday" => "Weekend!",
        _ => "Midweek",
    }
}

pub fn grade_for_score(score: u32) -> &'static str {
    match score {
        90.. => "Grade: A",
        80..=89 => "Grade: B",
        70..=79 => "Grade: C",
        _ => "Grade: F",
    }
}

pub fn sign_of(num: i32) -> &'static str {
    match num {
        n if n < 0 => "Negative number",
        n if n > 0 => "Positive number",
        _ => "Zero",
    }
}

pub fn season(month: &str) -> Option<&'static str> {
    match month {
        "December" | "January" | "February" => Some("Winter"),
        "March" | "April" | "May" => Some("Spring"),
        "June" | "July" | "August" => Some("Summer"),
        "September" | "October" | "November" => Some("Fall"),
        _ => None,
    }
}

/// `match` never falls through, so cascading cases are spelled out as a
/// slice of the remaining messages.
pub fn fallthrough_feedback(grade: &str) -> Vec<&'static str> {
    const CASCADE: [&str; 3] = ["Excellent!", "Good!", "Fair"];
    match grade {
        "A" => CASCADE.to_vec(),
        "B" => CASCADE[1..].to_vec(),
        "C" => CASCADE[2..].to_vec(),
        "F" => vec!["Failed"],
        _ => Vec::new(),
    }
}

/// Runtime type dispatch over `dyn Any`.
pub fn describe_value(value: &dyn Any) -> String {
    if let Some(v) = value.downcast_ref::<i32>() {
        format!("Integer: {v}")
    } else if let Some(v) = value.downcast_ref::<&str>() {
        format!("String: {v}")
    } else if let Some(v) = value.downcast_ref::<String>() {
        format!("String: {v}")
    } else if let Some(v) = value.downcast_ref::<f64>() {
        format!("Float: {v}")
    } else {
        format!("Unknown type: {:?}", value.type_id())
    }
}

pub fn classify_char(c: char) -> String {
    match c {
        'a' | 'e' | 'i' | 'o' | 'u' => format!("{c} is a vowel"),
        'a'..='z' => format!("{c} is a consonant"),
        _ => format!("{c} is not a letter"),
    }
}
