//! Read-only card showing the most recently accepted feedback.

use feedback_dom::DomNode;

use crate::entry::FeedbackEntry;

pub const STAR_SLOTS: usize = 5;

/// Which of the five star slots are filled. Ratings outside 0..=5 are
/// clamped.
pub fn star_slots(rating: i64) -> [bool; STAR_SLOTS] {
    let filled = rating.clamp(0, STAR_SLOTS as i64) as usize;
    std::array::from_fn(|i| i < filled)
}

pub fn render(entry: Option<&FeedbackEntry>) -> DomNode {
    match entry {
        None => render_placeholder(),
        Some(e) => render_entry(e),
    }
}

fn render_placeholder() -> DomNode {
    DomNode::new("section")
        .keyed("latest")
        .class("card placeholder")
        .child(DomNode::text("h2", "No Feedback Yet").keyed("latest-title"))
        .child(
            DomNode::text("p", "Submit the form above to see the latest feedback displayed here.")
                .class("muted"),
        )
}

fn render_entry(e: &FeedbackEntry) -> DomNode {
    let stars = star_slots(e.rating).into_iter().enumerate().map(|(i, filled)| {
        DomNode::text("span", if filled { "\u{2605}" } else { "\u{2606}" })
            .keyed(format!("star-{}", i))
            .class(if filled { "star filled" } else { "star" })
    });

    let rating = DomNode::new("div")
        .keyed("rating")
        .class("rating")
        .child(
            DomNode::new("div")
                .class("stars")
                .attr("aria-label", format!("{} out of {} stars", e.rating, STAR_SLOTS))
                .children(stars),
        )
        .child(DomNode::text("span", &format!("{}/{}", e.rating, STAR_SLOTS)).class("rating-value"));

    DomNode::new("section")
        .keyed("latest")
        .class("card latest")
        .child(
            DomNode::new("header")
                .class("card-header")
                .child(DomNode::text("h2", "Latest Feedback").keyed("latest-title"))
                .child(DomNode::text("span", "Most Recent").class("badge")),
        )
        .child(
            DomNode::new("div")
                .class("grid")
                .child(item("student", "Student", DomNode::text("p", &e.student_name)))
                .child(item("course", "Course", DomNode::text("p", &e.course_name))),
        )
        .child(item("email", "Email", DomNode::text("p", &e.email).class("email")))
        .child(item("rating", "Rating", rating))
        .child(item(
            "message",
            "Feedback",
            DomNode::text("p", &e.feedback_message).class("message"),
        ))
}

fn item(key: &str, label: &str, value: DomNode) -> DomNode {
    DomNode::new("div")
        .keyed(format!("latest-{}", key))
        .class("item")
        .child(DomNode::text("p", label).class("label"))
        .child(value)
}
