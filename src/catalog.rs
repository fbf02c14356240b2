//! Course listing: price filter, search and pagination.

use std::str::FromStr;

use crate::models::Course;

pub const ITEMS_PER_PAGE: usize = 9;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PriceFilter {
    #[default]
    All,
    Free,
    Paid,
}

impl PriceFilter {
    pub fn matches(self, course: &Course) -> bool {
        match self {
            PriceFilter::All => true,
            PriceFilter::Free => course.is_free(),
            PriceFilter::Paid => course.is_paid(),
        }
    }
}

impl FromStr for PriceFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "all" => Ok(PriceFilter::All),
            "free" => Ok(PriceFilter::Free),
            "paid" => Ok(PriceFilter::Paid),
            other => Err(format!("unknown price filter: {}", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// 1-based, after clamping.
    pub page: usize,
    pub total_pages: usize,
    pub total_items: usize,
}

impl<T> Page<T> {
    pub fn has_next(&self) -> bool {
        self.page < self.total_pages
    }

    pub fn has_previous(&self) -> bool {
        self.page > 1
    }
}

/// Slices `items` into the requested page. Out-of-range pages are clamped to the nearest valid one.
pub fn paginate<T: Clone>(items: &[T], page: usize, per_page: usize) -> Page<T> {
    let per_page = per_page.max(1);
    let total_items = items.len();
    let total_pages = total_items.div_ceil(per_page);
    let page = page.clamp(1, total_pages.max(1));

    let start = (page - 1) * per_page;
    let end = (start + per_page).min(total_items);
    let items = items.get(start..end).map(<[T]>::to_vec).unwrap_or_default();

    Page {
        items,
        page,
        total_pages,
        total_items,
    }
}

pub fn matches_search(course: &Course, search: &str) -> bool {
    let needle = search.trim().to_lowercase();
    if needle.is_empty() {
        return true;
    }
    course.title.to_lowercase().contains(&needle)
        || course
            .description
            .as_deref()
            .is_some_and(|d| d.to_lowercase().contains(&needle))
}

#[derive(Debug, Clone)]
pub struct CatalogQuery {
    pub search: String,
    pub price: PriceFilter,
    pub page: usize,
    pub per_page: usize,
    /// Dashboard listings show drafts too.
    pub include_unpublished: bool,
}

impl Default for CatalogQuery {
    fn default() -> Self {
        Self {
            search: String::new(),
            price: PriceFilter::All,
            page: 1,
            per_page: ITEMS_PER_PAGE,
            include_unpublished: false,
        }
    }
}

impl CatalogQuery {
    pub fn apply<'a>(&self, courses: &'a [Course]) -> Page<&'a Course> {
        let filtered: Vec<&Course> = courses
            .iter()
            .filter(|c| self.include_unpublished || c.is_published())
            .filter(|c| self.price.matches(c))
            .filter(|c| matches_search(c, &self.search))
            .collect();
        paginate(&filtered, self.page, self.per_page)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Id, PublishStatus};

    fn course(id: usize, title: &str, price: Option<f64>) -> Course {
        Course {
            id: Id::from(id.to_string()),
            title: title.to_string(),
            description: Some(format!("About {}", title)),
            price,
            thumbnail_url: None,
            organization_id: None,
            publish_status: PublishStatus::Published,
            lessons: Vec::new(),
            instructor_ids: Vec::new(),
        }
    }

    fn sample() -> Vec<Course> {
        vec![
            course(1, "Rust Basics", Some(0.0)),
            course(2, "Async Rust", Some(49.0)),
            course(3, "Web with Axum", None),
            course(4, "Databases", Some(19.5)),
            course(5, "Rust Macros", Some(0.0)),
            course(6, "Testing", Some(9.0)),
            course(7, "Embedded rust", None),
        ]
    }

    #[test]
    fn seven_courses_three_per_page_leaves_one_on_page_three() {
        let courses = sample();
        let query = CatalogQuery {
            page: 3,
            per_page: 3,
            ..CatalogQuery::default()
        };
        let page = query.apply(&courses);
        assert_eq!(page.total_pages, 3);
        assert_eq!(page.items.len(), 1);
        assert!(!page.has_next());
        assert!(page.has_previous());
    }

    #[test]
    fn price_filters_partition_the_catalog() {
        let courses = sample();
        for c in courses.iter().filter(|c| PriceFilter::Free.matches(c)) {
            assert!(c.price.is_none() || c.price == Some(0.0));
        }
        for c in courses.iter().filter(|c| PriceFilter::Paid.matches(c)) {
            assert!(c.price.unwrap() > 0.0);
        }
        let free = courses.iter().filter(|c| PriceFilter::Free.matches(c)).count();
        let paid = courses.iter().filter(|c| PriceFilter::Paid.matches(c)).count();
        assert_eq!(free + paid, courses.len());
    }

    #[test]
    fn pagination_invariants_hold_for_every_query() {
        let courses = sample();
        for price in [PriceFilter::All, PriceFilter::Free, PriceFilter::Paid] {
            for search in ["", "rust", "AXUM", "nothing"] {
                for per_page in 1..=8 {
                    for page in 0..=9 {
                        let query = CatalogQuery {
                            search: search.to_string(),
                            price,
                            page,
                            per_page,
                            include_unpublished: false,
                        };
                        let filtered = courses
                            .iter()
                            .filter(|c| price.matches(c) && matches_search(c, search))
                            .count();
                        let result = query.apply(&courses);
                        assert!(result.items.len() <= per_page);
                        assert_eq!(result.total_pages, filtered.div_ceil(per_page));
                        assert_eq!(result.total_items, filtered);
                    }
                }
            }
        }
    }

    #[test]
    fn search_is_case_insensitive_over_title_and_description() {
        let courses = sample();
        let query = CatalogQuery {
            search: "RUST".to_string(),
            ..CatalogQuery::default()
        };
        assert_eq!(query.apply(&courses).total_items, 4);
    }

    #[test]
    fn drafts_hidden_unless_requested() {
        let mut courses = sample();
        courses[0].publish_status = PublishStatus::Draft;
        assert_eq!(CatalogQuery::default().apply(&courses).total_items, 6);

        let dashboard = CatalogQuery {
            include_unpublished: true,
            ..CatalogQuery::default()
        };
        assert_eq!(dashboard.apply(&courses).total_items, 7);
    }

    #[test]
    fn parses_filter_names() {
        assert_eq!("Free".parse::<PriceFilter>().unwrap(), PriceFilter::Free);
        assert_eq!("".parse::<PriceFilter>().unwrap(), PriceFilter::All);
        assert!("cheap".parse::<PriceFilter>().is_err());
    }
}
