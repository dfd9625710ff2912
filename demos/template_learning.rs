//! Two decoder workers share one exporter session: they learn template
//! announcements on first sight and track the largest record per template.

use flow_session::{BasicSession, SessionConfig, Template, TemplateStore};
use std::sync::Arc;
use std::thread;

/// A stripped-down NetFlow v9 template: id, domain, and field lengths.
struct V9Template {
    id: u16,
    source_id: u32,
    field_lengths: Vec<u16>,
}

impl V9Template {
    fn record_len(&self) -> usize {
        self.field_lengths.iter().map(|&len| usize::from(len)).sum()
    }
}

impl Template for V9Template {
    fn template_id(&self) -> u16 {
        self.id
    }

    fn observation_domain_id(&self) -> u32 {
        self.source_id
    }
}

/// What the transport hands a worker: either a template announcement or a data record.
enum FlowSet {
    Template(u16, u32, Vec<u16>),
    Data(u16, u32, usize),
}

fn decode(session: &BasicSession<V9Template>, worker: usize, flowsets: Vec<FlowSet>) {
    for flowset in flowsets {
        let mut guard = session.lock();
        match flowset {
            FlowSet::Template(id, source_id, field_lengths) => {
                if guard.get_template(id, source_id).is_none() {
                    let template = Arc::new(V9Template { id, source_id, field_lengths });
                    tracing::info!(
                        "worker {}: learned template {}/{} ({} byte records)",
                        worker,
                        id,
                        source_id,
                        template.record_len()
                    );
                    guard.add_template(template);
                }
            }
            FlowSet::Data(id, source_id, len) => match guard.get_template(id, source_id) {
                Some(template) => {
                    guard.set_record_size(id, source_id, len.max(template.record_len()));
                }
                None => {
                    tracing::warn!("worker {}: data for unknown template {}/{}. Dropped.", worker, id, source_id);
                }
            },
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    let config = SessionConfig::from_toml_str("template_capacity = 1024\nrecord_size_capacity = 1024\n")?;
    let session = Arc::new(BasicSession::<V9Template>::with_config(&config));

    let batches = vec![
        vec![
            FlowSet::Template(256, 1, vec![4, 4, 2, 2, 1]),
            FlowSet::Data(256, 1, 13),
            FlowSet::Data(257, 1, 20),
        ],
        vec![
            FlowSet::Template(256, 1, vec![4, 4, 2, 2, 1]),
            FlowSet::Template(257, 1, vec![16, 16, 2, 2]),
            FlowSet::Data(257, 1, 40),
        ],
    ];

    let workers: Vec<_> = batches
        .into_iter()
        .enumerate()
        .map(|(worker, flowsets)| {
            let s = Arc::clone(&session);
            thread::spawn(move || decode(&s, worker, flowsets))
        })
        .collect();

    for worker in workers {
        worker.join().map_err(|_| "decoder worker panicked")?;
    }

    let guard = session.lock();
    for id in [256u16, 257] {
        tracing::info!(
            "template {}/1: known={} max record size={:?}",
            id,
            guard.contains_template(id, 1),
            guard.get_record_size(id, 1)
        );
    }

    Ok(())
}
