//! Runs the `Effect`s returned by `update()`.
//!
//! Every backend call and timer is a tokio task that reports back by sending
//! an `Action` over the std channel the event loop drains between frames.
//! Nothing here touches `App`; results are tagged with the generation or
//! nonce the reducer handed out, and the reducer decides what is stale.

use std::future::Future;
use std::sync::{Arc, mpsc};
use std::time::Duration;

use log::{debug, info, warn};

use crate::core::action::{Action, Effect, update};
use crate::core::config::ResolvedConfig;
use crate::core::state::App;
use crate::gateway::Backend;

#[derive(Clone)]
pub struct Executor {
    backend: Arc<dyn Backend>,
    tx: mpsc::Sender<Action>,
    type_delay: Duration,
    notice_duration: Duration,
    header_restore: Duration,
}

impl Executor {
    pub fn new(
        backend: Arc<dyn Backend>,
        tx: mpsc::Sender<Action>,
        config: &ResolvedConfig,
    ) -> Self {
        Self {
            backend,
            tx,
            type_delay: config.type_delay,
            notice_duration: config.notice_duration,
            header_restore: config.header_restore,
        }
    }

    /// Feed `action` to the reducer and start its effects.
    ///
    /// Returns `true` when the reducer asked to quit.
    pub fn dispatch(&self, app: &mut App, action: Action) -> bool {
        let mut quit = false;
        for effect in update(app, action) {
            if effect == Effect::Quit {
                quit = true;
            } else {
                self.execute(effect);
            }
        }
        quit
    }

    pub fn execute(&self, effect: Effect) {
        debug!("Executing {:?}", effect);
        match effect {
            Effect::Quit => {}
            Effect::LoadProjects { expand_title } => {
                let backend = Arc::clone(&self.backend);
                self.spawn_call(async move {
                    let result = backend.list_projects().await;
                    Action::ProjectsLoaded {
                        expand_title,
                        result,
                    }
                });
            }
            Effect::LoadHistory {
                generation,
                project,
                phase,
            } => {
                info!("Loading history for {}/{}", project, phase);
                let backend = Arc::clone(&self.backend);
                self.spawn_call(async move {
                    let result = backend.get_history(&project, &phase).await;
                    Action::HistoryLoaded {
                        generation,
                        project,
                        phase,
                        result,
                    }
                });
            }
            Effect::SendMessage {
                generation,
                message,
                project,
                phase,
            } => {
                info!("Sending message ({} bytes)", message.len());
                let backend = Arc::clone(&self.backend);
                self.spawn_call(async move {
                    let result = backend
                        .send_message(&message, project.as_deref(), phase.as_deref())
                        .await;
                    Action::ReplyReceived { generation, result }
                });
            }
            Effect::SaveContext {
                nonce,
                project,
                phase,
            } => {
                let backend = Arc::clone(&self.backend);
                self.spawn_call(async move {
                    let result = backend.save_context(&project, &phase).await;
                    Action::SaveFinished { nonce, result }
                });
            }
            Effect::RenameProject { slug, new_title } => {
                let backend = Arc::clone(&self.backend);
                self.spawn_call(async move {
                    let result = backend.rename_project(&slug, &new_title).await;
                    Action::RenameFinished {
                        slug,
                        new_title,
                        result,
                    }
                });
            }
            Effect::DeleteProject { slug, title } => {
                let backend = Arc::clone(&self.backend);
                self.spawn_call(async move {
                    let result = backend.delete_project(&slug).await;
                    Action::DeleteFinished {
                        slug,
                        title,
                        result,
                    }
                });
            }
            Effect::StartReveal { generation, steps } => {
                self.spawn_reveal(generation, steps);
            }
            Effect::DismissNoticeAfter { id } => {
                self.spawn_after(self.notice_duration, Action::DismissNotice(id));
            }
            Effect::RestoreHeaderAfter { nonce } => {
                self.spawn_after(self.header_restore, Action::RestoreHeader { nonce });
            }
        }
    }

    fn spawn_call<F>(&self, call: F)
    where
        F: Future<Output = Action> + Send + 'static,
    {
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let action = call.await;
            forward(&tx, action);
        });
    }

    fn spawn_after(&self, delay: Duration, action: Action) {
        let tx = self.tx.clone();
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            forward(&tx, action);
        });
    }

    /// One `RevealStep` per typewriter delay. Ticks from an abandoned reveal
    /// are rejected by the reducer, so the ticker never needs cancelling.
    fn spawn_reveal(&self, generation: u64, steps: usize) {
        let tx = self.tx.clone();
        let delay = self.type_delay;
        tokio::spawn(async move {
            for _ in 0..steps {
                tokio::time::sleep(delay).await;
                if !forward(&tx, Action::RevealStep { generation }) {
                    return;
                }
            }
        });
    }
}

fn forward(tx: &mpsc::Sender<Action>, action: Action) -> bool {
    if tx.send(action).is_err() {
        warn!("Failed to deliver action: receiver dropped");
        return false;
    }
    true
}
