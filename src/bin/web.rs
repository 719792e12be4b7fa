//! Single binary web server: JSON REST API for the league.
//! Run with: cargo run --bin web
//! Listens on 0.0.0.0:8080 by default so the app is reachable via DNS on a VPS.
//! Override with env: HOST (e.g. 0.0.0.0), PORT (e.g. 8080),
//! DATABASE_PATH (e.g. pingers.db).

use actix_web::{
    delete, get, patch, post,
    web::{Data, Json, Path, Query},
    App, HttpResponse, HttpServer, Responder,
};
use pingers_league::models::{
    LeagueError, MatchDetail, MatchStatus, NewMatch, NewPlayer, NewTournament, Player, PlayerId,
    PlayerPatch, Tournament, TournamentParticipant, TournamentPatch,
};
use pingers_league::{complete_match, group_tables, leaderboard, start_match, update_scores};
use pingers_league::{store, streak_display, win_percentage, DbConn, DbPool};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Serialize)]
struct HealthResponse {
    ok: bool,
    service: &'static str,
}

/// Path segment: resource id (e.g. /api/players/{id})
#[derive(Deserialize)]
struct IdPath {
    id: Uuid,
}

/// Optional filters for the match list.
#[derive(Deserialize)]
struct MatchListQuery {
    tournament_id: Option<Uuid>,
    player_id: Option<Uuid>,
}

/// Body for PATCH /api/matches/{id}: scores and/or a status transition.
#[derive(Deserialize)]
struct MatchUpdateBody {
    player1_score: Option<i32>,
    player2_score: Option<i32>,
    status: Option<MatchStatus>,
}

/// Body for registering a tournament participant.
#[derive(Deserialize)]
struct AddParticipantBody {
    player_id: PlayerId,
    #[serde(default)]
    seed: Option<i32>,
    #[serde(default)]
    group_name: Option<String>,
}

/// Head-to-head from one player's perspective.
#[derive(Serialize)]
struct HeadToHeadEntry {
    opponent_id: PlayerId,
    wins: i32,
    losses: i32,
}

/// Player detail: profile plus display stats and head-to-head records.
#[derive(Serialize)]
struct PlayerProfile {
    #[serde(flatten)]
    player: Player,
    win_percentage: f64,
    streak: String,
    head_to_head: Vec<HeadToHeadEntry>,
}

/// Tournament detail: container plus participants and matches joined in.
#[derive(Serialize)]
struct TournamentDetail {
    #[serde(flatten)]
    tournament: Tournament,
    participants: Vec<TournamentParticipant>,
    matches: Vec<MatchDetail>,
}

/// Map a league error to its HTTP status with a JSON error body.
fn error_response(e: &LeagueError) -> HttpResponse {
    let body = serde_json::json!({ "error": e.to_string() });
    match e {
        LeagueError::NotFound(_) => HttpResponse::NotFound().json(body),
        LeagueError::Validation(_) => HttpResponse::BadRequest().json(body),
        LeagueError::Conflict(_) => HttpResponse::Conflict().json(body),
        LeagueError::Storage(_) => {
            log::error!("storage error: {}", e);
            HttpResponse::InternalServerError().json(body)
        }
    }
}

/// Check out a pooled connection, or produce the 500 to return.
fn db(pool: &Data<DbPool>) -> Result<DbConn, HttpResponse> {
    pool.get().map_err(|e| {
        log::error!("database unavailable: {}", e);
        HttpResponse::InternalServerError()
            .json(serde_json::json!({ "error": "database unavailable" }))
    })
}

#[get("/api/health")]
async fn api_health() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        ok: true,
        service: "pingers-league",
    })
}

/// Avoid 404 in browser tab: favicon not required for app logic.
#[get("/favicon.ico")]
async fn favicon() -> HttpResponse {
    HttpResponse::NoContent().finish()
}

#[post("/api/players")]
async fn api_create_player(pool: Data<DbPool>, body: Json<NewPlayer>) -> HttpResponse {
    let conn = match db(&pool) {
        Ok(c) => c,
        Err(resp) => return resp,
    };
    match store::players::insert(&conn, body.into_inner()) {
        Ok(p) => HttpResponse::Ok().json(p),
        Err(e) => error_response(&e),
    }
}

/// All players, best record first.
#[get("/api/players")]
async fn api_list_players(pool: Data<DbPool>) -> HttpResponse {
    let conn = match db(&pool) {
        Ok(c) => c,
        Err(resp) => return resp,
    };
    match store::players::list(&conn) {
        Ok(players) => HttpResponse::Ok().json(players),
        Err(e) => error_response(&e),
    }
}

/// League leaderboard: win percentage, then total wins.
#[get("/api/players/leaderboard")]
async fn api_leaderboard(pool: Data<DbPool>) -> HttpResponse {
    let conn = match db(&pool) {
        Ok(c) => c,
        Err(resp) => return resp,
    };
    match store::players::list(&conn) {
        Ok(players) => HttpResponse::Ok().json(leaderboard(players)),
        Err(e) => error_response(&e),
    }
}

/// One player with win percentage, streak, and head-to-head records.
#[get("/api/players/{id}")]
async fn api_get_player(pool: Data<DbPool>, path: Path<IdPath>) -> HttpResponse {
    let conn = match db(&pool) {
        Ok(c) => c,
        Err(resp) => return resp,
    };
    let player = match store::players::get(&conn, path.id) {
        Ok(p) => p,
        Err(e) => return error_response(&e),
    };
    let records = match store::head_to_head::list_for_player(&conn, player.id) {
        Ok(r) => r,
        Err(e) => return error_response(&e),
    };
    let head_to_head = records
        .iter()
        .filter_map(|r| {
            let opponent_id = r.opponent_of(player.id)?;
            Some(HeadToHeadEntry {
                opponent_id,
                wins: r.wins_for(player.id)?,
                losses: r.wins_for(opponent_id)?,
            })
        })
        .collect();
    HttpResponse::Ok().json(PlayerProfile {
        win_percentage: win_percentage(player.wins, player.losses),
        streak: streak_display(player.current_streak),
        head_to_head,
        player,
    })
}

/// Admin override of any player field, including derived stats.
#[patch("/api/players/{id}")]
async fn api_update_player(
    pool: Data<DbPool>,
    path: Path<IdPath>,
    body: Json<PlayerPatch>,
) -> HttpResponse {
    let conn = match db(&pool) {
        Ok(c) => c,
        Err(resp) => return resp,
    };
    match store::players::update(&conn, path.id, &body) {
        Ok(p) => HttpResponse::Ok().json(p),
        Err(e) => error_response(&e),
    }
}

/// Delete a player account (cascades to their matches and records).
#[delete("/api/players/{id}")]
async fn api_delete_player(pool: Data<DbPool>, path: Path<IdPath>) -> HttpResponse {
    let conn = match db(&pool) {
        Ok(c) => c,
        Err(resp) => return resp,
    };
    match store::players::delete(&conn, path.id) {
        Ok(()) => HttpResponse::Ok().json(serde_json::json!({ "success": true })),
        Err(e) => error_response(&e),
    }
}

#[post("/api/tournaments")]
async fn api_create_tournament(pool: Data<DbPool>, body: Json<NewTournament>) -> HttpResponse {
    let conn = match db(&pool) {
        Ok(c) => c,
        Err(resp) => return resp,
    };
    match store::tournaments::insert(&conn, body.into_inner()) {
        Ok(t) => HttpResponse::Ok().json(t),
        Err(e) => error_response(&e),
    }
}

/// All tournaments, most recent first, with champion and entrant count.
#[get("/api/tournaments")]
async fn api_list_tournaments(pool: Data<DbPool>) -> HttpResponse {
    let conn = match db(&pool) {
        Ok(c) => c,
        Err(resp) => return resp,
    };
    match store::tournaments::list(&conn) {
        Ok(list) => HttpResponse::Ok().json(list),
        Err(e) => error_response(&e),
    }
}

/// One tournament with participants and matches joined in.
#[get("/api/tournaments/{id}")]
async fn api_get_tournament(pool: Data<DbPool>, path: Path<IdPath>) -> HttpResponse {
    let conn = match db(&pool) {
        Ok(c) => c,
        Err(resp) => return resp,
    };
    let tournament = match store::tournaments::get(&conn, path.id) {
        Ok(t) => t,
        Err(e) => return error_response(&e),
    };
    let participants = match store::tournaments::list_participants(&conn, tournament.id) {
        Ok(p) => p,
        Err(e) => return error_response(&e),
    };
    let matches = match store::matches::list(&conn, Some(tournament.id), None) {
        Ok(m) => m,
        Err(e) => return error_response(&e),
    };
    HttpResponse::Ok().json(TournamentDetail {
        tournament,
        participants,
        matches,
    })
}

#[patch("/api/tournaments/{id}")]
async fn api_update_tournament(
    pool: Data<DbPool>,
    path: Path<IdPath>,
    body: Json<TournamentPatch>,
) -> HttpResponse {
    let conn = match db(&pool) {
        Ok(c) => c,
        Err(resp) => return resp,
    };
    match store::tournaments::update(&conn, path.id, &body) {
        Ok(t) => HttpResponse::Ok().json(t),
        Err(e) => error_response(&e),
    }
}

#[delete("/api/tournaments/{id}")]
async fn api_delete_tournament(pool: Data<DbPool>, path: Path<IdPath>) -> HttpResponse {
    let conn = match db(&pool) {
        Ok(c) => c,
        Err(resp) => return resp,
    };
    match store::tournaments::delete(&conn, path.id) {
        Ok(()) => HttpResponse::Ok().json(serde_json::json!({ "success": true })),
        Err(e) => error_response(&e),
    }
}

/// Register a player for a tournament.
#[post("/api/tournaments/{id}/participants")]
async fn api_add_participant(
    pool: Data<DbPool>,
    path: Path<IdPath>,
    body: Json<AddParticipantBody>,
) -> HttpResponse {
    let conn = match db(&pool) {
        Ok(c) => c,
        Err(resp) => return resp,
    };
    match store::tournaments::add_participant(
        &conn,
        path.id,
        body.player_id,
        body.seed,
        body.group_name.clone(),
    ) {
        Ok(p) => HttpResponse::Ok().json(p),
        Err(e) => error_response(&e),
    }
}

/// Ranked group-stage tables for one tournament.
#[get("/api/tournaments/{id}/standings")]
async fn api_tournament_standings(pool: Data<DbPool>, path: Path<IdPath>) -> HttpResponse {
    let conn = match db(&pool) {
        Ok(c) => c,
        Err(resp) => return resp,
    };
    if let Err(e) = store::tournaments::get(&conn, path.id) {
        return error_response(&e);
    }
    match store::tournaments::list_participants(&conn, path.id) {
        Ok(participants) => HttpResponse::Ok().json(group_tables(participants)),
        Err(e) => error_response(&e),
    }
}

/// Schedule a match.
#[post("/api/matches")]
async fn api_create_match(pool: Data<DbPool>, body: Json<NewMatch>) -> HttpResponse {
    let conn = match db(&pool) {
        Ok(c) => c,
        Err(resp) => return resp,
    };
    match store::matches::insert(&conn, body.into_inner()) {
        Ok(m) => HttpResponse::Ok().json(m),
        Err(e) => error_response(&e),
    }
}

/// Matches, newest first, filterable by tournament and/or player.
#[get("/api/matches")]
async fn api_list_matches(pool: Data<DbPool>, query: Query<MatchListQuery>) -> HttpResponse {
    let conn = match db(&pool) {
        Ok(c) => c,
        Err(resp) => return resp,
    };
    match store::matches::list(&conn, query.tournament_id, query.player_id) {
        Ok(matches) => HttpResponse::Ok().json(matches),
        Err(e) => error_response(&e),
    }
}

#[get("/api/matches/{id}")]
async fn api_get_match(pool: Data<DbPool>, path: Path<IdPath>) -> HttpResponse {
    let conn = match db(&pool) {
        Ok(c) => c,
        Err(resp) => return resp,
    };
    match store::matches::get_detail(&conn, path.id) {
        Ok(m) => HttpResponse::Ok().json(m),
        Err(e) => error_response(&e),
    }
}

/// Update a match: running scores, start it, or complete it.
/// Completing applies the result to player stats, head-to-head, and group
/// tallies in one transaction.
#[patch("/api/matches/{id}")]
async fn api_update_match(
    pool: Data<DbPool>,
    path: Path<IdPath>,
    body: Json<MatchUpdateBody>,
) -> HttpResponse {
    let mut conn = match db(&pool) {
        Ok(c) => c,
        Err(resp) => return resp,
    };
    let result = match body.status {
        Some(MatchStatus::Completed) => match (body.player1_score, body.player2_score) {
            (Some(p1), Some(p2)) => complete_match(&mut conn, path.id, p1, p2),
            _ => Err(LeagueError::Validation(
                "both scores are required to complete a match".to_string(),
            )),
        },
        Some(MatchStatus::InProgress) => start_match(&conn, path.id).and_then(|detail| {
            if body.player1_score.is_some() || body.player2_score.is_some() {
                update_scores(&conn, path.id, body.player1_score, body.player2_score)
            } else {
                Ok(detail)
            }
        }),
        Some(MatchStatus::Scheduled) => Err(LeagueError::Validation(
            "a match cannot move back to scheduled".to_string(),
        )),
        None => update_scores(&conn, path.id, body.player1_score, body.player2_score),
    };
    match result {
        Ok(detail) => HttpResponse::Ok().json(detail),
        Err(e) => error_response(&e),
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_database_path() -> String {
    "pingers.db".to_string()
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let host = std::env::var("HOST").unwrap_or_else(|_| default_host());
    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or_else(default_port);
    let database_path =
        std::env::var("DATABASE_PATH").unwrap_or_else(|_| default_database_path());

    let pool = pingers_league::open_pool(&database_path)
        .map_err(|e| std::io::Error::other(e.to_string()))?;
    log::info!("Opened database at {}", database_path);

    let bind = (host.as_str(), port);
    log::info!("Starting server at http://{}:{}", bind.0, bind.1);

    let data = Data::new(pool);
    HttpServer::new(move || {
        App::new()
            .app_data(data.clone())
            .service(api_health)
            .service(favicon)
            .service(api_create_player)
            .service(api_list_players)
            .service(api_leaderboard)
            .service(api_get_player)
            .service(api_update_player)
            .service(api_delete_player)
            .service(api_create_tournament)
            .service(api_list_tournaments)
            .service(api_get_tournament)
            .service(api_update_tournament)
            .service(api_delete_tournament)
            .service(api_add_participant)
            .service(api_tournament_standings)
            .service(api_create_match)
            .service(api_list_matches)
            .service(api_get_match)
            .service(api_update_match)
    })
    .bind(bind)?
    .run()
    .await
}
