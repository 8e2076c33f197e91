use scraper::{ElementRef, Html, Selector};
use tracing::{debug, info, instrument, warn};

use scombz_core::types::{ScheduleEntry, Term, Timetable, UNSCHEDULED};
use scombz_store::Store;

use crate::error::{Result, ScrapeError};
use crate::period::resolve_period;

/// Radio button that is checked while the page shows the weekly grid
/// rather than the schedule list.
const DISPLAY_MODE_SELECTOR: &str = "#displayMode1";
const COURSE_SELECTOR: &str = ".timetable-course-top-btn";
const TEACHER_SELECTOR: &str = "div[data-toggle='tooltip'] > span";
const YEAR_SELECTOR: &str = "#nendo [selected]";
const TERM_SELECTOR: &str = "#kikanCd [selected]";
/// Weekday columns carry a `{n}-yobicol` class, Monday = 1.
const WEEKDAY_COLUMNS: i32 = 6;

struct Selectors {
    display_mode: Selector,
    course: Selector,
    teacher: Selector,
    year: Selector,
    term: Selector,
}

impl Selectors {
    fn new() -> Result<Self> {
        Ok(Self {
            display_mode: parse_selector(DISPLAY_MODE_SELECTOR)?,
            course: parse_selector(COURSE_SELECTOR)?,
            teacher: parse_selector(TEACHER_SELECTOR)?,
            year: parse_selector(YEAR_SELECTOR)?,
            term: parse_selector(TERM_SELECTOR)?,
        })
    }
}

fn parse_selector(selector: &str) -> Result<Selector> {
    Selector::parse(selector).map_err(|e| ScrapeError::Selector {
        selector: selector.to_string(),
        reason: format!("{e:?}"),
    })
}

/// Scrape the timetable page into a [`Timetable`].
///
/// Returns an empty timetable when the page is in schedule view or has no
/// course buttons at all. Otherwise every course button becomes an entry
/// and the term read from the year/term dropdowns is attached.
#[instrument(skip(html), fields(bytes = html.len()))]
pub fn scrape_timetable(html: &str) -> Result<Timetable> {
    let document = Html::parse_document(html);
    let selectors = Selectors::new()?;

    let grid_view = document
        .select(&selectors.display_mode)
        .next()
        .is_some_and(|el| el.value().attr("checked").is_some());
    if !grid_view {
        debug!("display mode is not the timetable grid; nothing to scrape");
        return Ok(Timetable::default());
    }

    let courses: Vec<ScheduleEntry> = document
        .select(&selectors.course)
        .map(|course| scrape_course(course, &selectors))
        .collect();
    if courses.is_empty() {
        debug!("no course buttons on page");
        return Ok(Timetable::default());
    }

    let year = selected_value(&document, &selectors.year);
    let term_code = selected_value(&document, &selectors.term);
    let term = Term::from_codes(year, term_code);

    info!(
        courses = courses.len(),
        unscheduled = courses.iter().filter(|c| !c.is_scheduled()).count(),
        year = ?term.year,
        phase = term.phase,
        "timetable scraped"
    );
    Ok(Timetable {
        courses,
        term: Some(term),
    })
}

/// Scrape `html` and overwrite the stored `timetable` field with the result.
///
/// Last write wins; nothing else in the store is touched.
pub fn sync_timetable(store: &Store, html: &str) -> Result<Timetable> {
    let timetable = scrape_timetable(html)?;
    store.set_timetable(&timetable)?;
    info!(courses = timetable.courses.len(), "stored timetable replaced");
    Ok(timetable)
}

fn scrape_course(course: ElementRef<'_>, selectors: &Selectors) -> ScheduleEntry {
    let id = course.value().attr("id").unwrap_or_default().to_string();
    let (day, period) = slot_of(course);
    let details = next_element_sibling(course);

    let classroom = details
        .and_then(first_element_child)
        .and_then(|el| el.value().attr("title"))
        .map(str::to_string);

    let teacher = details
        .map(|d| {
            d.select(&selectors.teacher)
                .filter(|span| span.value().attr("class").is_none())
                .map(|span| span.inner_html().replacen(",  ", "", 1))
                .collect()
        })
        .unwrap_or_default();

    debug!(%id, day, period, "course scraped");
    ScheduleEntry {
        day,
        period,
        id,
        name: course.inner_html(),
        classroom,
        teacher,
    }
}

/// Weekday and period of a course button.
///
/// The weekday comes from the `{n}-yobicol` class of the cell two levels up;
/// the period from the first cell of the row above that. Courses outside any
/// weekday column are irregular and get [`UNSCHEDULED`] for both.
fn slot_of(course: ElementRef<'_>) -> (i32, i32) {
    let cell = parent_element(course).and_then(parent_element);
    let class = cell
        .and_then(|c| c.value().attr("class"))
        .unwrap_or_default();

    let Some(day) = (1..=WEEKDAY_COLUMNS).find(|n| class.contains(&format!("{n}-yobicol"))) else {
        return (UNSCHEDULED, UNSCHEDULED);
    };

    let header = cell.and_then(parent_element).and_then(first_element_child);
    let period = header.and_then(|h| {
        let text: String = h.text().collect();
        resolve_period(&h.inner_html(), &text)
    });
    match period {
        Some((period, _)) => (day, period),
        None => {
            warn!(day, "weekday column found but period header unreadable");
            (day, UNSCHEDULED)
        }
    }
}

fn selected_value<'a>(document: &'a Html, selector: &Selector) -> Option<&'a str> {
    document
        .select(selector)
        .next()
        .and_then(|el| el.value().attr("value"))
}

fn parent_element(el: ElementRef<'_>) -> Option<ElementRef<'_>> {
    el.parent().and_then(ElementRef::wrap)
}

fn first_element_child(el: ElementRef<'_>) -> Option<ElementRef<'_>> {
    el.children().find_map(ElementRef::wrap)
}

fn next_element_sibling(el: ElementRef<'_>) -> Option<ElementRef<'_>> {
    el.next_siblings().find_map(ElementRef::wrap)
}
