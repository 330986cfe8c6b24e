use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::{PgPool, PgPoolOptions};
use sqlx::{Postgres, Transaction};

use super::{BoardStore, StoreTx};
use crate::config::Config;
use crate::error::AppError;
use crate::models::{Board, Card, CardPatch, Column};

const BOARD_FIELDS: &str = "id, name, password_hash, created_at, updated_at";
const COLUMN_FIELDS: &str = "id, board_id, name, order_num, created_at, updated_at";
const CARD_FIELDS: &str = "id, board_id, title, description, assignee, deadline, column_id, \
                           order_num, created_at, updated_at";

/// PostgreSQL-backed store.
///
/// Transactions run at the server's default isolation and take no row locks, so
/// concurrent appends to the same column may compute the same order.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn connect(config: &Config) -> Result<Self, AppError> {
        let pool = PgPoolOptions::new()
            .max_connections(config.database_max_connections)
            .connect(&config.database_url)
            .await?;
        log::info!("Connected to PostgreSQL");
        Ok(Self::new(pool))
    }

    /// Applies the embedded schema migrations.
    pub async fn migrate(&self) -> Result<(), AppError> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        log::info!("Database schema is up to date");
        Ok(())
    }
}

#[async_trait]
impl BoardStore for PgStore {
    async fn begin(&self) -> Result<Box<dyn StoreTx>, AppError> {
        let tx = self.pool.begin().await?;
        Ok(Box::new(PgTx { tx }))
    }
}

struct PgTx {
    tx: Transaction<'static, Postgres>,
}

#[async_trait]
impl StoreTx for PgTx {
    async fn insert_board(&mut self, board: &Board) -> Result<(), AppError> {
        sqlx::query(
            "INSERT INTO boards (id, name, password_hash, created_at, updated_at)
             VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(&board.id)
        .bind(&board.name)
        .bind(&board.password_hash)
        .bind(board.created_at)
        .bind(board.updated_at)
        .execute(&mut *self.tx)
        .await?;
        Ok(())
    }

    async fn find_board(&mut self, board_id: &str) -> Result<Option<Board>, AppError> {
        let board = sqlx::query_as::<_, Board>(&format!(
            "SELECT {} FROM boards WHERE id = $1",
            BOARD_FIELDS
        ))
        .bind(board_id)
        .fetch_optional(&mut *self.tx)
        .await?;
        Ok(board)
    }

    async fn list_columns(&mut self, board_id: &str) -> Result<Vec<Column>, AppError> {
        let columns = sqlx::query_as::<_, Column>(&format!(
            "SELECT {} FROM columns WHERE board_id = $1 ORDER BY order_num, created_at, id",
            COLUMN_FIELDS
        ))
        .bind(board_id)
        .fetch_all(&mut *self.tx)
        .await?;
        Ok(columns)
    }

    async fn list_cards(&mut self, board_id: &str) -> Result<Vec<Card>, AppError> {
        let cards = sqlx::query_as::<_, Card>(&format!(
            "SELECT {} FROM cards WHERE board_id = $1 ORDER BY order_num, created_at, id",
            CARD_FIELDS
        ))
        .bind(board_id)
        .fetch_all(&mut *self.tx)
        .await?;
        Ok(cards)
    }

    async fn column_orders(&mut self, board_id: &str) -> Result<Vec<i32>, AppError> {
        let orders = sqlx::query_scalar::<_, i32>("SELECT order_num FROM columns WHERE board_id = $1")
            .bind(board_id)
            .fetch_all(&mut *self.tx)
            .await?;
        Ok(orders)
    }

    async fn insert_column(&mut self, column: &Column) -> Result<(), AppError> {
        sqlx::query(
            "INSERT INTO columns (id, board_id, name, order_num, created_at, updated_at)
             VALUES ($1, $2, $3, $4, $5, $6)",
        )
        .bind(&column.id)
        .bind(&column.board_id)
        .bind(&column.name)
        .bind(column.order)
        .bind(column.created_at)
        .bind(column.updated_at)
        .execute(&mut *self.tx)
        .await?;
        Ok(())
    }

    async fn find_column(
        &mut self,
        board_id: &str,
        column_id: &str,
    ) -> Result<Option<Column>, AppError> {
        let column = sqlx::query_as::<_, Column>(&format!(
            "SELECT {} FROM columns WHERE id = $1 AND board_id = $2",
            COLUMN_FIELDS
        ))
        .bind(column_id)
        .bind(board_id)
        .fetch_optional(&mut *self.tx)
        .await?;
        Ok(column)
    }

    async fn rename_column(
        &mut self,
        board_id: &str,
        column_id: &str,
        name: &str,
        now: DateTime<Utc>,
    ) -> Result<u64, AppError> {
        let result = sqlx::query(
            "UPDATE columns SET name = $1, updated_at = $2 WHERE id = $3 AND board_id = $4",
        )
        .bind(name)
        .bind(now)
        .bind(column_id)
        .bind(board_id)
        .execute(&mut *self.tx)
        .await?;
        Ok(result.rows_affected())
    }

    async fn delete_column(&mut self, board_id: &str, column_id: &str) -> Result<u64, AppError> {
        sqlx::query("DELETE FROM cards WHERE column_id = $1 AND board_id = $2")
            .bind(column_id)
            .bind(board_id)
            .execute(&mut *self.tx)
            .await?;

        let result = sqlx::query("DELETE FROM columns WHERE id = $1 AND board_id = $2")
            .bind(column_id)
            .bind(board_id)
            .execute(&mut *self.tx)
            .await?;
        Ok(result.rows_affected())
    }

    async fn card_orders(
        &mut self,
        board_id: &str,
        column_id: &str,
    ) -> Result<Vec<i32>, AppError> {
        let orders = sqlx::query_scalar::<_, i32>(
            "SELECT order_num FROM cards WHERE board_id = $1 AND column_id = $2",
        )
        .bind(board_id)
        .bind(column_id)
        .fetch_all(&mut *self.tx)
        .await?;
        Ok(orders)
    }

    async fn insert_card(&mut self, card: &Card) -> Result<(), AppError> {
        sqlx::query(
            "INSERT INTO cards (id, board_id, title, description, assignee, deadline, column_id,
                                order_num, created_at, updated_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)",
        )
        .bind(&card.id)
        .bind(&card.board_id)
        .bind(&card.title)
        .bind(&card.description)
        .bind(&card.assignee)
        .bind(card.deadline)
        .bind(&card.column_id)
        .bind(card.order)
        .bind(card.created_at)
        .bind(card.updated_at)
        .execute(&mut *self.tx)
        .await?;
        Ok(())
    }

    async fn find_card(
        &mut self,
        board_id: &str,
        card_id: &str,
    ) -> Result<Option<Card>, AppError> {
        let card = sqlx::query_as::<_, Card>(&format!(
            "SELECT {} FROM cards WHERE id = $1 AND board_id = $2",
            CARD_FIELDS
        ))
        .bind(card_id)
        .bind(board_id)
        .fetch_optional(&mut *self.tx)
        .await?;
        Ok(card)
    }

    async fn update_card(
        &mut self,
        board_id: &str,
        card_id: &str,
        patch: &CardPatch,
        now: DateTime<Utc>,
    ) -> Result<u64, AppError> {
        // NULL parameters keep the stored value.
        let result = sqlx::query(
            "UPDATE cards
             SET title = COALESCE($1, title),
                 description = COALESCE($2, description),
                 assignee = COALESCE($3, assignee),
                 deadline = COALESCE($4, deadline),
                 updated_at = $5
             WHERE id = $6 AND board_id = $7",
        )
        .bind(&patch.title)
        .bind(&patch.description)
        .bind(&patch.assignee)
        .bind(patch.deadline)
        .bind(now)
        .bind(card_id)
        .bind(board_id)
        .execute(&mut *self.tx)
        .await?;
        Ok(result.rows_affected())
    }

    async fn place_card(
        &mut self,
        board_id: &str,
        card_id: &str,
        column_id: &str,
        order: i32,
        now: DateTime<Utc>,
    ) -> Result<u64, AppError> {
        let result = sqlx::query(
            "UPDATE cards SET column_id = $1, order_num = $2, updated_at = $3
             WHERE id = $4 AND board_id = $5",
        )
        .bind(column_id)
        .bind(order)
        .bind(now)
        .bind(card_id)
        .bind(board_id)
        .execute(&mut *self.tx)
        .await?;
        Ok(result.rows_affected())
    }

    async fn delete_card(&mut self, board_id: &str, card_id: &str) -> Result<u64, AppError> {
        let result = sqlx::query("DELETE FROM cards WHERE id = $1 AND board_id = $2")
            .bind(card_id)
            .bind(board_id)
            .execute(&mut *self.tx)
            .await?;
        Ok(result.rows_affected())
    }

    async fn commit(self: Box<Self>) -> Result<(), AppError> {
        self.tx.commit().await?;
        Ok(())
    }
}
