use pdf_async_runtime::{CardCommand, CardUpdate, RenderOptions, RenderTicket};
use tokio::sync::mpsc;

#[cfg(feature = "pdf-viewer")]
use pdf_cards::pdfium::{PdfiumDocument, PdfiumLoader};
#[cfg(feature = "pdf-viewer")]
use pdf_cards::{PdfDocument, RenderError, SourceError, load_document, render_page};

#[derive(Debug, Clone, Copy, PartialEq)]
struct RenderJob {
    ticket: RenderTicket,
    available_width: f32,
    options: RenderOptions,
}

/// Async worker task that loads the deck and renders pages
pub async fn worker_task(
    mut command_rx: mpsc::UnboundedReceiver<CardCommand>,
    update_tx: mpsc::UnboundedSender<CardUpdate>,
) {
    #[cfg(feature = "pdf-viewer")]
    let mut document: Option<PdfiumDocument> = None;

    while let Some(cmd) = command_rx.recv().await {
        process_command(
            cmd,
            #[cfg(feature = "pdf-viewer")]
            &mut document,
            &mut command_rx,
            &update_tx,
        )
        .await;
    }
}

async fn process_command(
    cmd: CardCommand,
    #[cfg(feature = "pdf-viewer")] document: &mut Option<PdfiumDocument>,
    command_rx: &mut mpsc::UnboundedReceiver<CardCommand>,
    update_tx: &mpsc::UnboundedSender<CardUpdate>,
) {
    match cmd {
        CardCommand::LoadDocument { path } => {
            #[cfg(feature = "pdf-viewer")]
            {
                let loaders = PdfiumLoader::strategies(&path);
                match load_document(&loaders).await {
                    Ok(doc) => {
                        let page_count = doc.page_count();
                        *document = Some(doc);
                        let _ = update_tx.send(CardUpdate::DocumentLoaded { path, page_count });
                    }
                    Err(e) => {
                        *document = None;
                        let _ = update_tx.send(CardUpdate::LoadFailed {
                            message: e.to_string(),
                        });
                    }
                }
            }

            #[cfg(not(feature = "pdf-viewer"))]
            {
                log::error!("Cannot open {}: PDF rendering is disabled", path.display());
                let _ = update_tx.send(CardUpdate::LoadFailed {
                    message: "PDF viewer not available (pdf-viewer feature disabled)".to_string(),
                });
            }
        }
        CardCommand::RenderPage {
            ticket,
            available_width,
            options,
        } => {
            let first = RenderJob {
                ticket,
                available_width,
                options,
            };
            let (jobs, others) = coalesce_renders(first, command_rx);

            // Non-render commands that were queued behind this one (document
            // reloads) go first so the renders see the new document
            for other in others {
                Box::pin(process_command(
                    other,
                    #[cfg(feature = "pdf-viewer")]
                    document,
                    command_rx,
                    update_tx,
                ))
                .await;
            }

            for job in jobs {
                #[cfg(feature = "pdf-viewer")]
                let result = match document.as_ref() {
                    Some(doc) => {
                        render_page(
                            doc,
                            job.ticket.page_number,
                            job.available_width,
                            &job.options,
                        )
                        .await
                    }
                    None => Err(RenderError::new(
                        job.ticket.page_number,
                        SourceError::Backend("no document loaded".to_string()),
                    )),
                };

                #[cfg(not(feature = "pdf-viewer"))]
                let result = Err(pdf_cards::RenderError::new(
                    job.ticket.page_number,
                    pdf_cards::SourceError::Backend("PDF rendering is disabled".to_string()),
                ));

                let _ = update_tx.send(CardUpdate::PageRendered {
                    ticket: job.ticket,
                    result,
                });
            }
        }
    }
}

/// Drain queued commands, keeping only the newest render per display target.
/// Returns the surviving renders and the other commands, both in arrival order.
fn coalesce_renders(
    first: RenderJob,
    command_rx: &mut mpsc::UnboundedReceiver<CardCommand>,
) -> (Vec<RenderJob>, Vec<CardCommand>) {
    let mut jobs = vec![first];
    let mut others = Vec::new();

    while let Ok(next_cmd) = command_rx.try_recv() {
        match next_cmd {
            CardCommand::RenderPage {
                ticket,
                available_width,
                options,
            } => {
                let job = RenderJob {
                    ticket,
                    available_width,
                    options,
                };
                match jobs.iter_mut().find(|j| j.ticket.target == ticket.target) {
                    Some(existing) => {
                        log::debug!(
                            "Discarding queued render of page {}, using newer request",
                            existing.ticket.page_number
                        );
                        *existing = job;
                    }
                    None => jobs.push(job),
                }
            }
            other => others.push(other),
        }
    }

    (jobs, others)
}
