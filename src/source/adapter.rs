//! Record adapter: turns one provider record into graph mutations

use super::record::{PaperRecord, RawRecord};
use crate::graph::{author_id, topic_id, val, value, Node, NodeGroup, PaperGraph};
use crate::notify::NewItem;
use crate::topic::TopicResolver;

/// Ingestion priority of a record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Priority {
    /// Curated seed, sized up in the graph
    Seed,
    /// Found by a live query
    Live,
}

impl Priority {
    fn paper_val(self) -> f64 {
        match self {
            Priority::Seed => val::SEED_PAPER,
            Priority::Live => val::PAPER,
        }
    }
}

/// What happened to one record
#[derive(Debug, Clone, PartialEq)]
pub enum IngestOutcome {
    /// New paper subgraph added
    Added(NewItem),
    /// Paper id already in the graph; nothing touched
    Known,
    /// No usable id or title; nothing touched
    Malformed,
}

/// Translates raw provider records into the paper/author/topic subgraph.
///
/// The paper node is the gate: if it already exists the record is done,
/// so authors and topics of a known paper are never revisited.
pub struct RecordAdapter {
    resolver: TopicResolver,
}

impl RecordAdapter {
    pub fn new(resolver: TopicResolver) -> Self {
        Self { resolver }
    }

    pub fn ingest(&self, graph: &mut PaperGraph, record: RawRecord, priority: Priority) -> IngestOutcome {
        let source = record.source();
        match record.into_paper() {
            Some(paper) => self.ingest_paper(graph, paper, priority),
            None => {
                tracing::debug!(provider = %source, "dropping record without id or title");
                IngestOutcome::Malformed
            }
        }
    }

    pub fn ingest_paper(
        &self,
        graph: &mut PaperGraph,
        paper: PaperRecord,
        priority: Priority,
    ) -> IngestOutcome {
        let paper_id = paper.native_id.clone();
        if !graph.add_node(paper_node(&paper, priority)) {
            return IngestOutcome::Known;
        }

        for name in &paper.authors {
            let id = author_id(name);
            graph.add_node(Node::new(&id, name.as_str(), NodeGroup::Author, val::AUTHOR));
            graph.add_link(&paper_id, &id, value::AUTHOR);
        }

        let topics = self
            .resolver
            .resolve(&paper.official_topics, paper.abstract_text.as_deref());
        for label in &topics {
            let id = topic_id(label);
            graph.add_node(Node::new(&id, label.as_str(), NodeGroup::Topic, val::TOPIC));
            graph.add_link(&paper_id, &id, value::TOPIC);
        }

        tracing::info!(
            paper_id = %paper_id,
            provider = %paper.source,
            authors = paper.authors.len(),
            topics = topics.len(),
            "added paper"
        );

        IngestOutcome::Added(NewItem {
            name: paper.title,
            url: paper.url,
        })
    }
}

/// Paper node with its own fresh attribute map
fn paper_node(paper: &PaperRecord, priority: Priority) -> Node {
    let mut node = Node::new(
        paper.native_id.as_str(),
        paper.title.as_str(),
        NodeGroup::Paper,
        priority.paper_val(),
    );
    if let Some(ref text) = paper.abstract_text {
        node = node.with_attribute("abstract", text.as_str());
    }
    if let Some(ref url) = paper.url {
        node = node.with_attribute("url", url.as_str());
    }
    if let Some(published) = paper.published {
        node = node
            .with_attribute("date", published.to_iso())
            .with_attribute("year", published.year());
    }
    node.with_attribute("source", paper.source.as_str())
}
