//! Diesel-backed message repository.
//!
//! Thread retrieval marks the counterparty's messages read and loads the
//! transcript inside one transaction, so a failed mark-read never yields a
//! transcript with stale unread state.

use std::collections::HashMap;

use async_trait::async_trait;
use diesel::prelude::*;
use uuid::Uuid;

use super::models::{MessageRow, NewMessageRow, UserRow};
use super::pool::{DbPool, RunError};
use super::schema::{messages, users};
use crate::domain::ports::{MessageRepository, MessageRepositoryError};
use crate::domain::{Message, ThreadMessage};

/// SQLite implementation of [`MessageRepository`].
#[derive(Clone)]
pub struct DieselMessageRepository {
    pool: DbPool,
}

impl DieselMessageRepository {
    /// Create a repository backed by the given pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_run_error(error: RunError) -> MessageRepositoryError {
    match error {
        RunError::Pool(err) => MessageRepositoryError::connection(err.to_string()),
        RunError::Query(err) => MessageRepositoryError::query(err.to_string()),
    }
}

#[async_trait]
impl MessageRepository for DieselMessageRepository {
    async fn insert(&self, message: &Message) -> Result<(), MessageRepositoryError> {
        let row = NewMessageRow::from_domain(message);
        self.pool
            .run(move |conn| {
                diesel::insert_into(messages::table)
                    .values(&row)
                    .execute(conn)
                    .map(|_| ())
            })
            .await
            .map_err(map_run_error)
    }

    async fn list_involving(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<Message>, MessageRepositoryError> {
        let user_id = user_id.to_string();
        self.pool
            .run(move |conn| {
                messages::table
                    .filter(
                        messages::sender_id
                            .eq(&user_id)
                            .or(messages::receiver_id.eq(&user_id)),
                    )
                    .order(messages::created_at.asc())
                    .select(MessageRow::as_select())
                    .load::<MessageRow>(conn)?
                    .into_iter()
                    .map(MessageRow::into_domain)
                    .collect()
            })
            .await
            .map_err(map_run_error)
    }

    async fn thread(
        &self,
        user_id: Uuid,
        counterparty_id: Uuid,
    ) -> Result<Vec<ThreadMessage>, MessageRepositoryError> {
        let user_id = user_id.to_string();
        let counterparty_id = counterparty_id.to_string();
        self.pool
            .run(move |conn| {
                conn.transaction(|conn| {
                    diesel::update(
                        messages::table
                            .filter(messages::receiver_id.eq(&user_id))
                            .filter(messages::sender_id.eq(&counterparty_id)),
                    )
                    .set(messages::read.eq(true))
                    .execute(conn)?;

                    let rows = messages::table
                        .filter(
                            messages::sender_id
                                .eq(&user_id)
                                .and(messages::receiver_id.eq(&counterparty_id))
                                .or(messages::sender_id
                                    .eq(&counterparty_id)
                                    .and(messages::receiver_id.eq(&user_id))),
                        )
                        .order(messages::created_at.asc())
                        .select(MessageRow::as_select())
                        .load::<MessageRow>(conn)?;

                    let participants = [user_id.clone(), counterparty_id.clone()];
                    let names: HashMap<String, String> = users::table
                        .filter(users::id.eq_any(participants))
                        .select(UserRow::as_select())
                        .load::<UserRow>(conn)?
                        .into_iter()
                        .map(|row| {
                            let name = format!("{} {}", row.first_name, row.last_name);
                            (row.id.clone(), name)
                        })
                        .collect();

                    rows.into_iter()
                        .map(|row| {
                            let sender_name = names
                                .get(&row.sender_id)
                                .cloned()
                                .ok_or(diesel::result::Error::NotFound)?;
                            let receiver_name = names
                                .get(&row.receiver_id)
                                .cloned()
                                .ok_or(diesel::result::Error::NotFound)?;
                            Ok(ThreadMessage {
                                message: row.into_domain()?,
                                sender_name,
                                receiver_name,
                            })
                        })
                        .collect()
                })
            })
            .await
            .map_err(map_run_error)
    }
}
