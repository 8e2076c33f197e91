// Scrapes a captured timetable page and checks the stored shape the
// timetable overlay reads back.

use scombz_core::types::{Term, Timetable, NO_COURSES_LABEL};
use scombz_store::Store;
use scombz_timetable::{scrape_timetable, sync_timetable};

const PAGE: &str = include_str!("fixtures/timetable.html");

#[test]
fn captured_page_yields_every_course_in_order() {
    let table = scrape_timetable(PAGE).unwrap();
    let ids: Vec<&str> = table.courses.iter().map(|c| c.id.as_str()).collect();
    assert_eq!(
        ids,
        ["202301MAT101", "202301PHY201", "202301ENG110", "202301SEM900"]
    );
}

#[test]
fn weekday_and_period_per_course() {
    let table = scrape_timetable(PAGE).unwrap();
    let slots: Vec<(i32, i32)> = table.courses.iter().map(|c| (c.day, c.period)).collect();
    assert_eq!(slots, [(1, 1), (4, 1), (6, 3), (-1, -1)]);
}

#[test]
fn name_keeps_raw_markup_and_teachers_skip_icons() {
    let table = scrape_timetable(PAGE).unwrap();
    assert_eq!(table.courses[1].name, "物理学<br>実験");
    assert_eq!(table.courses[0].teacher, ["山田 太郎", "佐藤 花子"]);
    assert_eq!(
        table.courses[0].classroom.as_deref(),
        Some("豊洲 研究棟 301")
    );
    assert!(table.courses[2].teacher.is_empty());
}

#[test]
fn term_is_second_half_of_selected_year() {
    let table = scrape_timetable(PAGE).unwrap();
    assert_eq!(
        table.term,
        Some(Term {
            year: Some(2023),
            phase: 2
        })
    );
}

#[test]
fn stored_sequence_round_trips_through_store() {
    let store = Store::open_in_memory().unwrap();
    let scraped = sync_timetable(&store, PAGE).unwrap();

    let blob = store.export_blob().unwrap();
    let seq = blob["scombzData"]["timetable"].as_array().unwrap();
    assert_eq!(seq.len(), scraped.courses.len() + 2);
    assert_eq!(seq[seq.len() - 2]["name"], NO_COURSES_LABEL);
    assert_eq!(seq[seq.len() - 1]["termPhase"], 2);

    let back: Timetable = store.timetable().unwrap();
    assert_eq!(back, scraped);
}
