//! Text rendering of results for chat messages.
//!
//! Output uses the chat platform's HTML subset, so free text is escaped.

use crate::record::MatchResult;
use crate::validate::format_date;
use std::fmt::Write;

/// Escapes `&`, `<` and `>` for HTML parse mode.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
    out
}

/// Full summary published to the broadcast channel.
pub fn format_summary(result: &MatchResult) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "🏉 <b>{} {}</b>{}",
        result.category,
        result.gender,
        if result.is_triangular() {
            " · Triangular"
        } else {
            ""
        }
    );
    out.push('\n');
    for team in &result.teams {
        let _ = writeln!(
            out,
            "<b>{}</b> {} ({} {})",
            escape_html(&team.name),
            team.score,
            team.tries,
            if team.tries == 1 { "try" } else { "tries" }
        );
    }
    if !result.sub_matches.is_empty() {
        out.push('\n');
        for leg in &result.sub_matches {
            let _ = writeln!(
                out,
                "• {} {}-{} {}",
                escape_html(&leg.home),
                leg.home_score,
                leg.away_score,
                escape_html(&leg.away)
            );
        }
    }
    out.push('\n');
    let _ = writeln!(out, "📅 {}", format_date(result.date));
    if let Some(referee) = &result.referee {
        let _ = writeln!(out, "🧑‍⚖️ Referee: {}", escape_html(referee));
    }
    let _ = write!(out, "✍️ Submitted by {}", escape_html(&result.submitted_by.name));
    out
}

/// One-line form used when listing results.
pub fn format_list_line(result: &MatchResult) -> String {
    let teams = result
        .teams
        .iter()
        .map(|t| format!("{} {}", escape_html(&t.name), t.score))
        .collect::<Vec<_>>()
        .join(" · ");
    format!(
        "#{} {} {} {}: {}",
        result.id,
        format_date(result.date),
        result.category,
        result.gender,
        teams
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::category::{Category, Gender, MatchType};
    use crate::record::{MatchDraft, Submitter, TeamLine};
    use chrono::{NaiveDate, Utc};

    fn result(match_type: MatchType, teams: Vec<TeamLine>, referee: Option<&str>) -> MatchResult {
        MatchResult::from_draft(
            12,
            MatchDraft {
                category: Category::U14,
                gender: Gender::Male,
                match_type,
                teams,
                date: NaiveDate::from_ymd_opt(2026, 4, 2).unwrap(),
                referee: referee.map(str::to_string),
                submitted_by: Submitter {
                    user_id: 1,
                    name: "Kim <coach>".to_string(),
                },
                sub_matches: vec![],
            },
            Utc::now(),
        )
    }

    #[test]
    fn summary_contains_every_field() {
        let r = result(
            MatchType::Standard,
            vec![TeamLine::new("Lions", 24, 4), TeamLine::new("Tigers", 5, 1)],
            Some("Pat"),
        );
        let text = format_summary(&r);
        assert!(text.contains("U14 Male"));
        assert!(text.contains("<b>Lions</b> 24 (4 tries)"));
        assert!(text.contains("<b>Tigers</b> 5 (1 try)"));
        assert!(text.contains("02/04/2026"));
        assert!(text.contains("Referee: Pat"));
        assert!(text.contains("Kim &lt;coach&gt;"));
        assert!(!text.contains("Triangular"));
    }

    #[test]
    fn summary_omits_missing_referee() {
        let r = result(
            MatchType::Standard,
            vec![TeamLine::new("A", 0, 0), TeamLine::new("B", 3, 0)],
            None,
        );
        assert!(!format_summary(&r).contains("Referee"));
    }

    #[test]
    fn triangular_summary_lists_three_teams() {
        let r = result(
            MatchType::Triangular,
            vec![
                TeamLine::new("A", 10, 2),
                TeamLine::new("B", 5, 1),
                TeamLine::new("C", 0, 0),
            ],
            None,
        );
        let text = format_summary(&r);
        assert!(text.contains("Triangular"));
        assert!(text.contains("<b>C</b> 0 (0 tries)"));
    }

    #[test]
    fn list_line_is_compact() {
        let r = result(
            MatchType::Standard,
            vec![TeamLine::new("Lions & Co", 24, 4), TeamLine::new("Tigers", 5, 1)],
            None,
        );
        assert_eq!(
            format_list_line(&r),
            "#12 02/04/2026 U14 Male: Lions &amp; Co 24 · Tigers 5"
        );
    }
}
