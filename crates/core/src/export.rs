//! Timetable layout handed to exporters: sessions grouped by group title,
//! then by day (Monday first), then ordered by period.

use std::collections::BTreeMap;

use types::{Day, GroupTitle, SessionRow};

pub type Timetable = BTreeMap<GroupTitle, BTreeMap<Day, Vec<SessionRow>>>;

pub fn group_timetable(rows: &[SessionRow]) -> Timetable {
    let mut out: Timetable = BTreeMap::new();
    for row in rows {
        out.entry(row.group.clone())
            .or_default()
            .entry(row.day)
            .or_default()
            .push(row.clone());
    }
    for days in out.values_mut() {
        for sessions in days.values_mut() {
            sessions.sort_by_key(|r| r.period);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use types::Period;

    fn row(group: &str, subject: &str, day: Day, period: u8) -> SessionRow {
        SessionRow {
            group: group.into(),
            subject: subject.into(),
            lecturer: "L".into(),
            classroom: "R".into(),
            day,
            period: Period(period),
        }
    }

    #[test]
    fn groups_by_title_then_day_then_period() {
        let rows = vec![
            row("B", "Math", Day::Friday, 1),
            row("A", "OOP", Day::Tuesday, 3),
            row("A", "Math", Day::Tuesday, 1),
            row("A", "Logic", Day::Monday, 2),
        ];
        let t = group_timetable(&rows);

        let groups: Vec<_> = t.keys().map(|g| g.as_str()).collect();
        assert_eq!(groups, ["A", "B"]);
        let a = &t[&GroupTitle::from("A")];
        let days: Vec<_> = a.keys().copied().collect();
        assert_eq!(days, [Day::Monday, Day::Tuesday]);
        let tuesday: Vec<_> = a[&Day::Tuesday].iter().map(|r| r.subject.as_str()).collect();
        assert_eq!(tuesday, ["Math", "OOP"]);
    }
}
