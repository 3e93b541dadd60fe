use chrono::{Datelike, Duration, NaiveDate};

pub const FOLLOW_UP_PROMPT: &str = "You are a helpful assistant for real estate agents. \
You help them manage their schedule and book appointments with clients.";

const ROLE: &str = r#"You are a helpful assistant for real estate agents. You help them manage their schedule and book appointments with clients.
You can call functions to get appointments, book appointments, find availability, and find optimal days for reconnecting with clients.
You can also ask the user for more information if needed.
If clientId and agentId are not provided, use the default values of 1 for each."#;

const BOOKING_RULES: &str = r#"While booking an appointment,
- if the end time is not provided, ask how long the appointment is for.
- if the title is not provided, make sure to ask for the title of the appointment."#;

const AVAILABILITY_RULES: &str = r#"While trying to find availability,
- if the input contains a date in natural language, convert it to a valid date format.
- if the input is something like "this weekend" or "tomorrow" or "next week", convert it to valid time range(s).
- if the time ranges are provided, convert them into valid ISO 8601 date formats and separate the start time and end time with a '|' character.
- if multiple time ranges are provided, separate out each time range with a comma.
- if the event type is not specified while finding availability, ask for it and it should be one of - showing, call, meeting.
- a successful response contains the time ranges in ISO 8601 format. Convert them to natural language."#;

const OPTIMAL_DAY_RULES: &str = r#"While finding optimal days, if you get a list of dates as a response,
return those dates in natural language while maintaining the order in which they were returned.
Example inputs:
- when should I reconnect with my longer term clients?
- when should I do my work?
- when should I do my follow ups?"#;

/// Builds the first-phase system instruction for the given current date.
pub fn system_prompt(today: NaiveDate) -> String {
    let examples = availability_examples(today);
    format!(
        "{ROLE}\nToday's date is {today}.\n\n{BOOKING_RULES}\n\n{AVAILABILITY_RULES}\n\n\
         Example inputs with time range conversions and event type deductions:\n{examples}\n\n\
         {OPTIMAL_DAY_RULES}",
        today = today.format("%Y-%m-%d"),
    )
}

fn availability_examples(today: NaiveDate) -> String {
    let tomorrow = today + Duration::days(1);

    let to_saturday = (5 - today.weekday().num_days_from_monday() as i64 + 7) % 7;
    let saturday = today + Duration::days(to_saturday);
    let sunday = saturday + Duration::days(1);

    let to_monday = 7 - today.weekday().num_days_from_monday() as i64;
    let monday = today + Duration::days(to_monday);
    let next_sunday = monday + Duration::days(6);

    [
        ("When am I available tomorrow for a showing?", tomorrow, tomorrow, "showing"),
        ("Find availability for a meeting this weekend.", saturday, sunday, "meeting"),
        ("I need to find a time for a call next week.", monday, next_sunday, "call"),
    ]
    .iter()
    .map(|(input, start, end, event)| {
        format!(
            "- Input: \"{input}\"\n  time range: {}T00:00:00|{}T23:59:59\n  event type: {event}",
            start.format("%Y-%m-%d"),
            end.format("%Y-%m-%d"),
        )
    })
    .collect::<Vec<_>>()
    .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn test_prompt_includes_today_and_rules() {
        let prompt = system_prompt(date("2025-04-27"));
        assert!(prompt.contains("Today's date is 2025-04-27."));
        assert!(prompt.contains("default values of 1"));
        assert!(prompt.contains("showing, call, meeting"));
        assert!(prompt.contains("maintaining the order"));
    }

    #[test]
    fn test_examples_follow_the_calendar() {
        // 2025-04-27 is a Sunday.
        let prompt = system_prompt(date("2025-04-27"));
        assert!(prompt.contains("2025-04-28T00:00:00|2025-04-28T23:59:59"));
        assert!(prompt.contains("2025-05-03T00:00:00|2025-05-04T23:59:59"));
        assert!(prompt.contains("2025-04-28T00:00:00|2025-05-04T23:59:59"));
    }

    #[test]
    fn test_weekend_on_saturday_is_today() {
        let prompt = system_prompt(date("2025-05-03"));
        assert!(prompt.contains("2025-05-03T00:00:00|2025-05-04T23:59:59"));
        assert!(prompt.contains("2025-05-05T00:00:00|2025-05-11T23:59:59"));
    }
}
