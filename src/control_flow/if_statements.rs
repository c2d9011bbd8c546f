//! Example: Conditionals as expressions

pub fn is_adult(age: u32) -> bool {
    age >= 18
}

pub fn pass_fail(score: u32) -> &'static str {
    if score >= 60 {
        "You passed!"
    } else {
        "You failed!"
    }
}

pub fn letter_grade(grade: u32) -> char {
    if grade >= 90 {
        'A'
    } else if grade >= 80 {
        'B'
    } else if grade >= 70 {
        'C'
    } else {
        'F'
    }
}

/// Parses and checks in one `if let` with a guard.
pub fn greater_than_forty(input: &str) -> Option<String> {
    if let Ok(num) = input.parse::<i32>() {
        if num > 40 {
            return Some(format!("{num} is greater than 40"));
        }
    }
    None
}

pub fn student_status(is_student: bool, has_id: bool) -> &'static str {
    if is_student {
        if has_id {
            "Student has valid ID"
        } else {
            "Student needs ID"
        }
    } else {
        "Not a student"
    }
}

pub fn can_drive(age: u32, has_license: bool) -> bool {
    age >= 18 && has_license
}

pub fn day_off(is_weekend: bool, is_holiday: bool) -> bool {
    is_weekend || is_holiday
}

pub fn weather_report(temperature: i32, humidity: i32) -> &'static str {
    if temperature > 30 && humidity > 70 {
        "It's too hot and humid!"
    } else if temperature < 10 || humidity < 30 {
        "It's too cold or dry!"
    } else {
        "The weather is comfortable"
    }
}

#[cfg(test)]
mod if_statements_tests {
    use super::*;

    #[test]
    fn test_simple_conditions() {
        assert!(is_adult(18));
        assert!(!is_adult(17));
        assert_eq!(pass_fail(75), "You passed!");
        assert_eq!(pass_fail(59), "You failed!");
    }

    #[test]
    fn test_letter_grade_boundaries() {
        let cases = [(95, 'A'), (90, 'A'), (85, 'B'), (80, 'B'), (70, 'C'), (69, 'F'), (0, 'F')];
        for (score, expected) in cases {
            assert_eq!(letter_grade(score), expected, "score {score}");
        }
    }

    #[test]
    fn test_nested_and_combined() {
        assert_eq!(greater_than_forty("42").as_deref(), Some("42 is greater than 40"));
        assert!(greater_than_forty("40").is_none());
        assert!(greater_than_forty("abc").is_none());
        assert_eq!(student_status(true, true), "Student has valid ID");
        assert_eq!(student_status(true, false), "Student needs ID");
        assert_eq!(student_status(false, true), "Not a student");
        assert!(can_drive(25, true));
        assert!(!can_drive(25, false));
        assert!(day_off(true, false));
        assert!(!day_off(false, false));
    }

    #[test]
    fn test_weather() {
        assert_eq!(weather_report(35, 80), "It's too hot and humid!");
        assert_eq!(weather_report(5, 50), "It's too cold or dry!");
        assert_eq!(weather_report(20, 20), "It's too cold or dry!");
        assert_eq!(weather_report(25, 60), "The weather is comfortable");
    }
}
