//! Dashboard aggregation service.
//!
//! Read-only, recomputed in full on every request: loads the relevant rows
//! and derives visitor windows, course scores, latest activity, and a
//! six-month visitor histogram in memory.

use campus_common::AppResult;
use campus_db::entities::{news, review, topic_answer, visitor};
use campus_db::repositories::{
    CourseRepository, NewsRepository, ReviewRepository, TopicRepository, VisitorRepository,
};
use chrono::{DateTime, Datelike, Months, NaiveDate, Utc};
use serde::Serialize;

/// Months covered by the visitor histogram.
const HISTOGRAM_MONTHS: u32 = 6;

/// Latest-N window for messages and activities.
const LATEST_LIMIT: usize = 5;

/// Month-over-month visitor comparison.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VisitorsComparison {
    pub this_month: usize,
    pub last_month: usize,
    /// Percent change, rounded to two decimals.
    pub change: f64,
}

/// Course with its average review score.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseScore {
    pub id: String,
    pub name: String,
    /// Average review score, rounded to two decimals; 0 without reviews.
    pub score: f64,
}

/// A recent visitor message (topic answer or review).
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageItem {
    pub kind: &'static str,
    pub id: String,
    pub author: String,
    pub text: String,
    pub created_at: String,
}

/// A recent activity (published news).
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityItem {
    pub id: String,
    pub title: String,
    pub published_date: Option<String>,
}

/// One month of the visitor histogram.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyCount {
    /// `YYYY-MM`.
    pub month: String,
    pub count: usize,
}

/// The dashboard payload.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardResponse {
    pub visitor_count: usize,
    pub course_count: usize,
    pub new_messages: usize,
    pub today_activities: usize,
    pub visitors_comparison: VisitorsComparison,
    pub courses: Vec<CourseScore>,
    pub latest_messages: Vec<MessageItem>,
    pub latest_activities: Vec<ActivityItem>,
    pub monthly_users: Vec<MonthlyCount>,
}

/// Dashboard service.
#[derive(Clone)]
pub struct DashboardService {
    visitor_repo: VisitorRepository,
    course_repo: CourseRepository,
    review_repo: ReviewRepository,
    topic_repo: TopicRepository,
    news_repo: NewsRepository,
}

impl DashboardService {
    /// Create a new dashboard service.
    #[must_use]
    pub const fn new(
        visitor_repo: VisitorRepository,
        course_repo: CourseRepository,
        review_repo: ReviewRepository,
        topic_repo: TopicRepository,
        news_repo: NewsRepository,
    ) -> Self {
        Self {
            visitor_repo,
            course_repo,
            review_repo,
            topic_repo,
            news_repo,
        }
    }

    /// Compute the dashboard payload.
    pub async fn compute(&self) -> AppResult<DashboardResponse> {
        let visitors = self.visitor_repo.find_all().await?;
        let courses = self.course_repo.find_all().await?;
        let answers = self.topic_repo.find_all_answers().await?;
        let reviews = self.review_repo.find_all().await?;
        let articles = self.news_repo.find_all_unfiltered().await?;

        let mut course_scores = Vec::with_capacity(courses.len());
        for course in &courses {
            let course_reviews = self.review_repo.find_by_course(&course.id).await?;
            course_scores.push(CourseScore {
                id: course.id.clone(),
                name: course.name.clone(),
                score: average_score(&course_reviews),
            });
        }

        Ok(build_dashboard(
            Utc::now(),
            &visitors,
            course_scores,
            &answers,
            &reviews,
            &articles,
        ))
    }
}

fn build_dashboard(
    now: DateTime<Utc>,
    visitors: &[visitor::Model],
    course_scores: Vec<CourseScore>,
    answers: &[topic_answer::Model],
    reviews: &[review::Model],
    articles: &[news::Model],
) -> DashboardResponse {
    let today = now.date_naive();
    let this_month = month_key(today);
    let last_month = month_key(
        today
            .checked_sub_months(Months::new(1))
            .unwrap_or(today),
    );

    let visitor_count = visitors
        .iter()
        .filter(|v| v.created_at.date_naive() == today)
        .count();
    let this_month_visitors = visitors
        .iter()
        .filter(|v| month_key(v.created_at.date_naive()) == this_month)
        .count();
    let last_month_visitors = visitors
        .iter()
        .filter(|v| month_key(v.created_at.date_naive()) == last_month)
        .count();

    let new_messages = answers
        .iter()
        .filter(|a| a.created_at.date_naive() == today)
        .count()
        + reviews
            .iter()
            .filter(|r| r.created_at.date_naive() == today)
            .count();

    let today_activities = articles
        .iter()
        .filter(|n| n.published_date.is_some_and(|d| d.date_naive() == today))
        .count();

    let mut messages: Vec<MessageItem> = answers
        .iter()
        .map(|a| MessageItem {
            kind: "answer",
            id: a.id.clone(),
            author: a.answered_by.clone(),
            text: a.answer_text.clone(),
            created_at: a.created_at.to_rfc3339(),
        })
        .chain(reviews.iter().map(|r| MessageItem {
            kind: "review",
            id: r.id.clone(),
            author: r.username.clone(),
            text: r.comment.clone().unwrap_or_default(),
            created_at: r.created_at.to_rfc3339(),
        }))
        .collect();
    messages.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    messages.truncate(LATEST_LIMIT);

    let mut activities: Vec<&news::Model> = articles.iter().collect();
    activities.sort_by(|a, b| b.published_date.cmp(&a.published_date));
    let latest_activities = activities
        .into_iter()
        .take(LATEST_LIMIT)
        .map(|n| ActivityItem {
            id: n.id.clone(),
            title: n.title.clone(),
            published_date: n.published_date.map(|d| d.to_rfc3339()),
        })
        .collect();

    let monthly_users = rolling_months(today, HISTOGRAM_MONTHS)
        .into_iter()
        .map(|month| {
            let count = visitors
                .iter()
                .filter(|v| month_key(v.created_at.date_naive()) == month)
                .count();
            MonthlyCount { month, count }
        })
        .collect();

    DashboardResponse {
        visitor_count,
        course_count: course_scores.len(),
        new_messages,
        today_activities,
        visitors_comparison: VisitorsComparison {
            this_month: this_month_visitors,
            last_month: last_month_visitors,
            change: percent_change(this_month_visitors, last_month_visitors),
        },
        courses: course_scores,
        latest_messages: messages,
        latest_activities,
        monthly_users,
    }
}

/// `YYYY-MM` bucket for a date.
fn month_key(date: NaiveDate) -> String {
    format!("{:04}-{:02}", date.year(), date.month())
}

/// The last `n` month keys ending at `today`'s month, oldest first.
fn rolling_months(today: NaiveDate, n: u32) -> Vec<String> {
    (0..n)
        .rev()
        .map(|back| {
            month_key(
                today
                    .checked_sub_months(Months::new(back))
                    .unwrap_or(today),
            )
        })
        .collect()
}

/// Month-over-month percent change, rounded to two decimals.
///
/// A zero baseline with current activity reads as a full 100% gain.
fn percent_change(this_month: usize, last_month: usize) -> f64 {
    if last_month > 0 {
        let raw = (this_month as f64 - last_month as f64) / last_month as f64 * 100.0;
        (raw * 100.0).round() / 100.0
    } else if this_month > 0 {
        100.0
    } else {
        0.0
    }
}

/// Average review score rounded to two decimals; 0 without reviews.
fn average_score(reviews: &[review::Model]) -> f64 {
    if reviews.is_empty() {
        return 0.0;
    }
    let total: f64 = reviews.iter().filter_map(|r| r.score).map(f64::from).sum();
    let avg = total / reviews.len() as f64;
    (avg * 100.0).round() / 100.0
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_month_key() {
        let date = NaiveDate::from_ymd_opt(2025, 3, 7).unwrap();
        assert_eq!(month_key(date), "2025-03");
    }

    #[test]
    fn test_rolling_months_spans_year_boundary() {
        let date = NaiveDate::from_ymd_opt(2025, 2, 15).unwrap();
        let months = rolling_months(date, 6);
        assert_eq!(
            months,
            vec!["2024-09", "2024-10", "2024-11", "2024-12", "2025-01", "2025-02"]
        );
    }

    #[test]
    fn test_percent_change() {
        assert_eq!(percent_change(150, 100), 50.0);
        assert_eq!(percent_change(50, 100), -50.0);
        assert_eq!(percent_change(10, 0), 100.0);
        assert_eq!(percent_change(0, 0), 0.0);
        assert_eq!(percent_change(1, 3), -66.67);
    }

    #[test]
    fn test_build_dashboard_counts_today() {
        let now = Utc::now();
        let old = now - chrono::Duration::days(45);

        let visit = |at: DateTime<Utc>| visitor::Model {
            id: "v".to_string(),
            ip: "203.0.113.1".to_string(),
            last_seen_at: None,
            created_at: at.into(),
        };
        let visitors = vec![visit(now), visit(now), visit(old)];

        let article = news::Model {
            id: "n1".to_string(),
            title: "Launch".to_string(),
            content: "body".to_string(),
            short_description: None,
            published_date: Some(now.into()),
            status: campus_db::entities::Visibility::Show,
            view_count: 0,
            img_id: None,
            created_at: now.into(),
            updated_at: None,
            deleted_at: None,
        };

        let dashboard = build_dashboard(now, &visitors, vec![], &[], &[], &[article]);

        assert_eq!(dashboard.visitor_count, 2);
        assert_eq!(dashboard.today_activities, 1);
        assert_eq!(dashboard.visitors_comparison.this_month, 2);
        assert_eq!(dashboard.monthly_users.len(), 6);
        assert_eq!(dashboard.latest_activities.len(), 1);
    }

    #[test]
    fn test_average_score() {
        let make = |score| review::Model {
            id: "r".to_string(),
            course_id: "c".to_string(),
            username: "u".to_string(),
            score,
            comment: None,
            created_at: Utc::now().into(),
            updated_at: None,
            deleted_at: None,
        };

        assert_eq!(average_score(&[]), 0.0);
        assert_eq!(average_score(&[make(Some(4.0)), make(Some(5.0))]), 4.5);
        // A scoreless review still counts toward the divisor.
        assert_eq!(average_score(&[make(Some(3.0)), make(None)]), 1.5);
    }
}
