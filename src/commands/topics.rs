//! Topic listing

use prettytable::{cell, row, Table};

use crate::topics::QuizTopic;

pub fn list_topics() {
    topics_table().printstd();
}

fn topics_table() -> Table {
    let mut table = Table::new();
    table.add_row(row![b => "Slug", "Topic"]);
    for topic in QuizTopic::ALL {
        table.add_row(row![topic.slug(), topic.title()]);
    }
    table
}
