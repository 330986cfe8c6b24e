//! Runs against a real PostgreSQL database. Set `DATABASE_URL` (or put it in `.env`)
//! and run with `--ignored`.

mod common;

use dotenv::dotenv;
use pretty_assertions::assert_eq;
use std::sync::Arc;

use taskboard::models::{ColumnInput, CreateBoardRequest, CreateCardRequest, MoveCardRequest};
use taskboard::store::PgStore;
use taskboard::{AppError, BoardService};

async fn pg_service() -> BoardService {
    dotenv().ok();
    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set for tests");
    let pool = sqlx::PgPool::connect(&database_url)
        .await
        .expect("Failed to connect to test DB");

    let store = PgStore::new(pool);
    store.migrate().await.expect("migrations apply");
    BoardService::new(Arc::new(store), common::identity())
}

fn card(title: &str, column_id: &str) -> CreateCardRequest {
    CreateCardRequest {
        title: title.to_string(),
        description: None,
        assignee: None,
        deadline: None,
        column_id: column_id.to_string(),
    }
}

#[test_log::test(tokio::test)]
#[ignore]
async fn test_board_round_trip_in_postgres() {
    let service = pg_service().await;

    let (view, _) = service
        .create_board(CreateBoardRequest {
            name: "Postgres board".into(),
            password: common::PASSWORD.into(),
        })
        .await
        .unwrap();
    let board_id = view.board.id.clone();
    let todo = view.columns[0].column.id.clone();
    let doing = view.columns[1].column.id.clone();

    service.login(&board_id, common::PASSWORD).await.unwrap();

    let review = service
        .create_column(&board_id, ColumnInput { name: "Review".into() })
        .await
        .unwrap();
    assert_eq!(review.order, 4);

    let first = service.create_card(&board_id, card("First", &todo)).await.unwrap();
    let second = service.create_card(&board_id, card("Second", &todo)).await.unwrap();
    assert_eq!((first.order, second.order), (1, 2));

    let moved = service
        .move_card(
            &board_id,
            &first.id,
            MoveCardRequest {
                column_id: doing.clone(),
                order: None,
            },
        )
        .await
        .unwrap();
    assert_eq!(moved.column_id, doing);
    assert_eq!(moved.order, 1);

    service.delete_column(&board_id, &todo).await.unwrap();
    let gone = service.delete_card(&board_id, &second.id).await;
    assert!(matches!(gone, Err(AppError::NotFound(_))));

    let loaded = service.get_board(&board_id).await.unwrap();
    let names: Vec<_> = loaded
        .columns
        .iter()
        .map(|c| c.column.name.as_str())
        .collect();
    assert_eq!(names, vec!["В работе", "Выполнено", "Review"]);
    assert_eq!(loaded.columns[0].cards, vec![moved]);
}
