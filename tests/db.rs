// Fluxos que passam pelo banco: cada teste recebe um Postgres novo com as migrações aplicadas.

mod common;

use axum::http::StatusCode;
use serde_json::{json, Value};
use sqlx::PgPool;
use uuid::Uuid;

use common::{app_with, get, json_request, send, token_as, token_for};
use crm_backend::models::auth::Role;

async fn seed_consultant(pool: &PgPool, email: &str) -> Uuid {
    sqlx::query_scalar(
        "INSERT INTO consultants (name, phone, email, password_hash) VALUES ($1, '(11) 90000-0000', $2, 'x') RETURNING id",
    )
    .bind(email.split('@').next().unwrap_or(email))
    .bind(email)
    .fetch_one(pool)
    .await
    .unwrap()
}

async fn seed_lead(pool: &PgPool, name: &str, consultant_id: Option<Uuid>) -> Uuid {
    sqlx::query_scalar("INSERT INTO leads (name, phone, consultant_id) VALUES ($1, '(11) 91234-5678', $2) RETURNING id")
        .bind(name)
        .bind(consultant_id)
        .fetch_one(pool)
        .await
        .unwrap()
}

async fn lead_status(pool: &PgPool, id: Uuid) -> String {
    sqlx::query_scalar("SELECT status::text FROM leads WHERE id = $1")
        .bind(id)
        .fetch_one(pool)
        .await
        .unwrap()
}

fn id_of(body: &Value) -> Uuid {
    body["id"].as_str().and_then(|s| s.parse().ok()).expect("resposta sem id")
}

#[sqlx::test]
async fn create_lead_returns_the_stored_row(pool: PgPool) {
    let admin = token_for(Role::Admin);
    let request = json_request(
        "POST",
        "/api/clientes",
        Some(&admin),
        json!({ "name": "  Maria  ", "phone": "11912345678", "cpf": "12345678901", "state": "sp" }),
    );

    let (response, body) = send(app_with(pool.clone()), request).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    assert_eq!(body["name"], "Maria");
    assert_eq!(body["phone"], "(11) 91234-5678");
    assert_eq!(body["cpf"], "123.456.789-01");
    assert_eq!(body["state"], "SP");
    assert_eq!(body["status"], "novo");

    let (response, body) = send(app_with(pool), get(&format!("/api/clientes/{}", id_of(&body)), Some(&admin))).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body["name"], "Maria");
}

#[sqlx::test]
async fn update_of_missing_lead_is_a_server_error(pool: PgPool) {
    let admin = token_for(Role::Admin);
    let request = json_request(
        "PUT",
        &format!("/api/clientes/{}", Uuid::new_v4()),
        Some(&admin),
        json!({ "name": "Fantasma", "phone": "11912345678" }),
    );

    let (response, _) = send(app_with(pool.clone()), request).await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let (response, _) = send(app_with(pool), get(&format!("/api/clientes/{}", Uuid::new_v4()), Some(&admin))).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test]
async fn scheduling_a_visit_moves_the_lead(pool: PgPool) {
    let lead_id = seed_lead(&pool, "Ana", None).await;
    let request = json_request(
        "POST",
        "/api/agendamentos",
        Some(&token_for(Role::Admin)),
        json!({ "leadId": lead_id, "visitDate": "2025-03-20", "visitTime": "14:30" }),
    );

    let (response, body) = send(app_with(pool.clone()), request).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    assert_eq!(body["status"], "agendado");
    assert_eq!(lead_status(&pool, lead_id).await, "AGENDADO");
}

#[sqlx::test]
async fn closing_closes_the_lead_and_recalculates_commission(pool: PgPool) {
    let admin = token_for(Role::Admin);
    let lead_id = seed_lead(&pool, "Bruno", None).await;

    let request = json_request("POST", "/api/fechamentos", Some(&admin), json!({ "leadId": lead_id, "value": 15000 }));
    let (response, body) = send(app_with(pool.clone()), request).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    assert_eq!(body["commission"].as_f64(), Some(75.0));
    assert_eq!(lead_status(&pool, lead_id).await, "FECHADO");

    let closing_id = id_of(&body);
    let request = json_request(
        "PUT",
        &format!("/api/fechamentos/{closing_id}"),
        Some(&admin),
        json!({ "leadId": lead_id, "value": 20000 }),
    );
    let (response, body) = send(app_with(pool), request).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body["value"].as_f64(), Some(20000.0));
    assert_eq!(body["commission"].as_f64(), Some(100.0));
}

#[sqlx::test]
async fn closing_for_missing_lead_leaves_nothing_behind(pool: PgPool) {
    let request = json_request(
        "POST",
        "/api/fechamentos",
        Some(&token_for(Role::Admin)),
        json!({ "leadId": Uuid::new_v4(), "value": 1000 }),
    );

    let (response, _) = send(app_with(pool.clone()), request).await;
    assert!(response.status().is_server_error());

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM closings").fetch_one(&pool).await.unwrap();
    assert_eq!(count, 0);
}

#[sqlx::test]
async fn consultants_only_see_their_own_leads(pool: PgPool) {
    let ana = seed_consultant(&pool, "ana@crm.com").await;
    let beto = seed_consultant(&pool, "beto@crm.com").await;
    let mine = seed_lead(&pool, "Cliente da Ana", Some(ana)).await;
    let theirs = seed_lead(&pool, "Cliente do Beto", Some(beto)).await;
    let token = token_as(ana, Role::Consultor);

    // O filtro de outro consultor é ignorado
    let (response, body) = send(app_with(pool.clone()), get(&format!("/api/clientes?consultantId={beto}"), Some(&token))).await;
    assert_eq!(response.status(), StatusCode::OK);
    let ids: Vec<Uuid> = body
        .as_array()
        .unwrap()
        .iter()
        .map(id_of)
        .collect();
    assert_eq!(ids, vec![mine]);

    let (response, _) = send(app_with(pool.clone()), get(&format!("/api/clientes/{theirs}"), Some(&token))).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let (response, _) = send(app_with(pool), get(&format!("/api/clientes/{mine}"), Some(&token))).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[sqlx::test]
async fn consultant_cannot_move_a_visit_to_another_consultants_lead(pool: PgPool) {
    let ana = seed_consultant(&pool, "ana@crm.com").await;
    let beto = seed_consultant(&pool, "beto@crm.com").await;
    let mine = seed_lead(&pool, "Cliente da Ana", Some(ana)).await;
    let theirs = seed_lead(&pool, "Cliente do Beto", Some(beto)).await;
    let token = token_as(ana, Role::Consultor);

    let request = json_request(
        "POST",
        "/api/agendamentos",
        Some(&token),
        json!({ "leadId": mine, "visitDate": "2025-03-20", "visitTime": "10:00" }),
    );
    let (response, body) = send(app_with(pool.clone()), request).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let visit_id = id_of(&body);

    let request = json_request(
        "PUT",
        &format!("/api/agendamentos/{visit_id}"),
        Some(&token),
        json!({ "leadId": theirs, "visitDate": "2025-03-21", "visitTime": "10:00" }),
    );
    let (response, _) = send(app_with(pool.clone()), request).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let lead_id: Uuid = sqlx::query_scalar("SELECT lead_id FROM visits WHERE id = $1")
        .bind(visit_id)
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(lead_id, mine);
}

#[sqlx::test]
async fn pricing_allows_many_campaigns_per_city_but_no_repeats(pool: PgPool) {
    let admin = token_for(Role::Admin);
    let pricing = |campaign: &str| {
        json_request(
            "POST",
            "/api/meta-ads/precos",
            Some(&admin),
            json!({ "city": "Campinas", "state": "sp", "pricePerLead": 10, "campaignId": campaign }),
        )
    };

    let (response, _) = send(app_with(pool.clone()), pricing("111")).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let (response, _) = send(app_with(pool.clone()), pricing("222")).await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let (response, body) = send(app_with(pool), pricing("111")).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
    assert_eq!(body["details"]["entity"], "ad_pricing");
}

#[sqlx::test]
async fn consultant_email_cannot_repeat_an_admin_email(pool: PgPool) {
    sqlx::query("INSERT INTO users (name, email, password_hash) VALUES ('Dono', 'dono@crm.com', 'x')")
        .execute(&pool)
        .await
        .unwrap();

    let request = json_request(
        "POST",
        "/api/consultores",
        Some(&token_for(Role::Admin)),
        json!({ "name": "Carla", "phone": "11912345678", "email": "Dono@CRM.com", "password": "segredo1" }),
    );
    let (response, _) = send(app_with(pool.clone()), request).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM consultants").fetch_one(&pool).await.unwrap();
    assert_eq!(count, 0);
}
