//! Single binary JSON API server for the digital soccer game.
//! Run with: cargo run --bin web
//! Listens on 0.0.0.0:8080 by default.
//! Override with env: HOST (e.g. 0.0.0.0), PORT (e.g. 8080),
//! DEMO_SEED=1 to start with the demo clubs loaded.

use actix_web::{
    delete, get, post, put,
    web::{Data, Json, Path, Query},
    App, HttpResponse, HttpServer, Responder,
};
use chrono::{DateTime, Utc};
use futebol_digital_web::{
    active_match_for_team, advance_round, can_shoot, compute_standings, create_championship,
    create_round, delete_championship, delete_round, level_for_goals, match_top_scorers, rankings,
    set_match_score, shoot, sweep, update_championship_teams, update_round, ChampionshipKind,
    ErrorKind, GameError, GameStore, Level, MatchId, Plan, Team, TeamId, TieBreakFallback,
    UserStatus, UserUpdate,
};
use serde::Deserialize;
use std::sync::RwLock;
use std::time::Duration;
use uuid::Uuid;

/// Shared game state: one store behind one lock. Taking the write lock for
/// the whole of an operation is what makes each operation atomic.
type AppState = Data<RwLock<GameStore>>;

/// How often the background task sweeps round statuses.
const SWEEP_INTERVAL: Duration = Duration::from_secs(60);

#[derive(serde::Serialize)]
struct HealthResponse {
    ok: bool,
    service: &'static str,
}

#[derive(Deserialize)]
struct RegisterUserBody {
    name: String,
    email: String,
    team_defending_id: TeamId,
    team_heart_id: Option<TeamId>,
}

#[derive(Deserialize)]
struct UpdateUserBody {
    name: Option<String>,
    plan: Option<Plan>,
    status: Option<UserStatus>,
    team_defending_id: Option<TeamId>,
    team_heart_id: Option<TeamId>,
}

#[derive(Deserialize)]
struct ShootBody {
    match_id: MatchId,
}

#[derive(Deserialize)]
struct SetPlanBody {
    plan: Plan,
}

#[derive(Deserialize)]
struct BoostBody {
    boost_expires_at: DateTime<Utc>,
}

#[derive(Deserialize)]
struct TeamBody {
    name: String,
    primary_color: String,
    secondary_color: String,
    shield_url: Option<String>,
}

#[derive(Deserialize)]
struct CreateChampionshipBody {
    name: String,
    kind: ChampionshipKind,
    team_ids: Vec<TeamId>,
    start_date: DateTime<Utc>,
    tie_break_fallback: Option<TieBreakFallback>,
}

#[derive(Deserialize)]
struct ReplaceTeamsBody {
    team_ids: Vec<TeamId>,
}

#[derive(Deserialize)]
struct CreateRoundBody {
    championship_id: Uuid,
    team_a_id: TeamId,
    team_b_id: TeamId,
    start_time: DateTime<Utc>,
    end_time: DateTime<Utc>,
}

#[derive(Deserialize)]
struct UpdateRoundBody {
    start_time: DateTime<Utc>,
    end_time: DateTime<Utc>,
}

#[derive(Deserialize)]
struct SetScoreBody {
    score_team_a: u32,
    score_team_b: u32,
}

#[derive(Deserialize)]
struct LimitQuery {
    limit: Option<usize>,
}

/// Path segment: entity id (e.g. /api/users/{id})
#[derive(Deserialize)]
struct IdPath {
    id: Uuid,
}

/// Map an error to its HTTP response; cooldown errors carry the remaining
/// seconds so clients can render a countdown.
fn error_response(e: &GameError) -> HttpResponse {
    let body = match e {
        GameError::CooldownActive { seconds_remaining } => {
            serde_json::json!({ "error": e.to_string(), "seconds_remaining": seconds_remaining })
        }
        _ => serde_json::json!({ "error": e.to_string() }),
    };
    match e.kind() {
        ErrorKind::Validation => HttpResponse::BadRequest().json(body),
        ErrorKind::NotEligible | ErrorKind::Conflict => HttpResponse::Conflict().json(body),
        ErrorKind::NotFound => HttpResponse::NotFound().json(body),
    }
}

fn lock_error() -> HttpResponse {
    HttpResponse::InternalServerError().body("lock error")
}

#[get("/api/health")]
async fn api_health() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        ok: true,
        service: "futebol-digital-web",
    })
}

// --- users -----------------------------------------------------------------

/// Register a user. The defending team is mandatory; the heart team
/// defaults to it.
#[post("/api/users")]
async fn api_register_user(state: AppState, body: Json<RegisterUserBody>) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    let body = body.into_inner();
    match g.register_user(
        body.name.trim(),
        body.email.trim(),
        body.team_defending_id,
        body.team_heart_id,
        Utc::now(),
    ) {
        Ok(user) => HttpResponse::Ok().json(user),
        Err(e) => error_response(&e),
    }
}

/// Profile: the user, their computed level, their shot clearance, and the
/// match their defended team is currently playing (if any).
#[get("/api/users/{id}")]
async fn api_get_user(state: AppState, path: Path<IdPath>) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    let now = Utc::now();
    sweep(&mut g, now);
    let user = match g.user(path.id) {
        Ok(user) => user.clone(),
        Err(e) => return error_response(&e),
    };
    let level = level_for_goals(&g.levels, user.total_goals).cloned();
    let clearance = match can_shoot(&g, user.id, now) {
        Ok(clearance) => clearance,
        Err(e) => return error_response(&e),
    };
    let current_match_id = active_match_for_team(&mut g, user.team_defending_id, now).ok();
    HttpResponse::Ok().json(serde_json::json!({
        "user": user,
        "level": level,
        "clearance": clearance,
        "current_match_id": current_match_id,
    }))
}

/// Admin edit: name, plan, status, teams.
#[put("/api/users/{id}")]
async fn api_update_user(state: AppState, path: Path<IdPath>, body: Json<UpdateUserBody>) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    let body = body.into_inner();
    let update = UserUpdate {
        name: body.name,
        plan: body.plan,
        status: body.status,
        team_defending_id: body.team_defending_id,
        team_heart_id: body.team_heart_id,
    };
    match g.update_user(path.id, update) {
        Ok(user) => HttpResponse::Ok().json(user),
        Err(e) => error_response(&e),
    }
}

/// Cooldown clearance only; match eligibility is checked on the shot.
#[get("/api/users/{id}/can-shoot")]
async fn api_can_shoot(state: AppState, path: Path<IdPath>) -> HttpResponse {
    let g = match state.read() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    match can_shoot(&g, path.id, Utc::now()) {
        Ok(clearance) => HttpResponse::Ok().json(clearance),
        Err(e) => error_response(&e),
    }
}

/// Take a shot at a match.
#[post("/api/users/{id}/shoot")]
async fn api_shoot(state: AppState, path: Path<IdPath>, body: Json<ShootBody>) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    match shoot(&mut g, path.id, body.match_id, Utc::now()) {
        Ok(outcome) => HttpResponse::Ok().json(outcome),
        Err(e) => error_response(&e),
    }
}

/// Payment-provider callback: plan change.
#[put("/api/users/{id}/plan")]
async fn api_set_plan(state: AppState, path: Path<IdPath>, body: Json<SetPlanBody>) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    match g.user_mut(path.id) {
        Ok(user) => {
            user.plan = body.plan;
            HttpResponse::Ok().json(&*user)
        }
        Err(e) => error_response(&e),
    }
}

/// Payment-provider callback: boost purchase.
#[post("/api/users/{id}/boost")]
async fn api_set_boost(state: AppState, path: Path<IdPath>, body: Json<BoostBody>) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    match g.user_mut(path.id) {
        Ok(user) => {
            user.boost_expires_at = Some(body.boost_expires_at);
            HttpResponse::Ok().json(&*user)
        }
        Err(e) => error_response(&e),
    }
}

/// Global player ranking (current round first, lifetime as tie-break).
#[get("/api/rankings")]
async fn api_rankings(state: AppState, query: Query<LimitQuery>) -> HttpResponse {
    let g = match state.read() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    HttpResponse::Ok().json(rankings(&g, query.limit.unwrap_or(20)))
}

// --- teams -----------------------------------------------------------------

#[get("/api/teams")]
async fn api_list_teams(state: AppState) -> HttpResponse {
    let g = match state.read() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    let mut teams: Vec<_> = g.teams.values().cloned().collect();
    teams.sort_by(|a, b| a.name.cmp(&b.name));
    HttpResponse::Ok().json(teams)
}

#[post("/api/teams")]
async fn api_create_team(state: AppState, body: Json<TeamBody>) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    let body = body.into_inner();
    let mut team = Team::new(body.name.trim(), body.primary_color, body.secondary_color);
    team.shield_url = body.shield_url;
    match g.create_team(team) {
        Ok(team) => HttpResponse::Ok().json(team),
        Err(e) => error_response(&e),
    }
}

#[put("/api/teams/{id}")]
async fn api_update_team(state: AppState, path: Path<IdPath>, body: Json<TeamBody>) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    let body = body.into_inner();
    let taken = g
        .teams
        .values()
        .any(|t| t.id != path.id && t.name.eq_ignore_ascii_case(body.name.trim()));
    if taken {
        return error_response(&GameError::DuplicateTeamName);
    }
    match g.teams.get_mut(&path.id) {
        Some(team) => {
            team.name = body.name.trim().to_string();
            team.primary_color = body.primary_color;
            team.secondary_color = body.secondary_color;
            team.shield_url = body.shield_url;
            HttpResponse::Ok().json(&*team)
        }
        None => error_response(&GameError::TeamNotFound(path.id)),
    }
}

/// Delete a team (rejected while referenced by users or competitions).
#[delete("/api/teams/{id}")]
async fn api_delete_team(state: AppState, path: Path<IdPath>) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    match g.delete_team(path.id) {
        Ok(()) => HttpResponse::NoContent().finish(),
        Err(e) => error_response(&e),
    }
}

// --- levels ----------------------------------------------------------------

#[get("/api/levels")]
async fn api_list_levels(state: AppState) -> HttpResponse {
    let g = match state.read() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    HttpResponse::Ok().json(&g.levels)
}

/// Replace the whole ladder; rejected unless the ranges partition 0..
#[put("/api/levels")]
async fn api_replace_levels(state: AppState, body: Json<Vec<Level>>) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    match g.set_ladder(body.into_inner()) {
        Ok(()) => HttpResponse::Ok().json(&g.levels),
        Err(e) => error_response(&e),
    }
}

// --- championships ---------------------------------------------------------

/// Create a championship and generate its full (league) or first-phase
/// (cup) schedule in one step.
#[post("/api/championships")]
async fn api_create_championship(state: AppState, body: Json<CreateChampionshipBody>) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    let body = body.into_inner();
    let fallback = body.tie_break_fallback.unwrap_or_default();
    match create_championship(
        &mut g,
        body.name.trim(),
        body.kind,
        body.team_ids,
        body.start_date,
        fallback,
    ) {
        Ok(id) => HttpResponse::Ok().json(serde_json::json!({
            "championship": g.championships[&id],
            "rounds": g.rounds_of(id),
        })),
        Err(e) => error_response(&e),
    }
}

#[get("/api/championships")]
async fn api_list_championships(state: AppState) -> HttpResponse {
    let g = match state.read() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    let mut championships: Vec<_> = g.championships.values().cloned().collect();
    championships.sort_by(|a, b| a.start_date.cmp(&b.start_date));
    HttpResponse::Ok().json(championships)
}

#[get("/api/championships/{id}")]
async fn api_get_championship(state: AppState, path: Path<IdPath>) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    sweep(&mut g, Utc::now());
    match g.championship(path.id) {
        Ok(championship) => HttpResponse::Ok().json(championship),
        Err(e) => error_response(&e),
    }
}

/// Replace the team set; drops and regenerates the whole schedule.
#[put("/api/championships/{id}/teams")]
async fn api_replace_championship_teams(
    state: AppState,
    path: Path<IdPath>,
    body: Json<ReplaceTeamsBody>,
) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    match update_championship_teams(&mut g, path.id, body.into_inner().team_ids) {
        Ok(()) => HttpResponse::Ok().json(&g.championships[&path.id]),
        Err(e) => error_response(&e),
    }
}

#[delete("/api/championships/{id}")]
async fn api_delete_championship(state: AppState, path: Path<IdPath>) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    match delete_championship(&mut g, path.id) {
        Ok(()) => HttpResponse::NoContent().finish(),
        Err(e) => error_response(&e),
    }
}

/// League table or cup bracket, recomputed from match history.
#[get("/api/championships/{id}/standings")]
async fn api_standings(state: AppState, path: Path<IdPath>) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    sweep(&mut g, Utc::now());
    match compute_standings(&g, path.id) {
        Ok(standings) => HttpResponse::Ok().json(standings),
        Err(e) => error_response(&e),
    }
}

#[get("/api/championships/{id}/rounds")]
async fn api_list_rounds(state: AppState, path: Path<IdPath>) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    sweep(&mut g, Utc::now());
    if let Err(e) = g.championship(path.id) {
        return error_response(&e);
    }
    HttpResponse::Ok().json(g.rounds_of(path.id))
}

// --- rounds and matches ----------------------------------------------------

/// Manually add a round with a single fixture (admin tooling).
#[post("/api/rounds")]
async fn api_create_round(state: AppState, body: Json<CreateRoundBody>) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    let body = body.into_inner();
    match create_round(
        &mut g,
        body.championship_id,
        body.team_a_id,
        body.team_b_id,
        body.start_time,
        body.end_time,
    ) {
        Ok(round_id) => HttpResponse::Ok().json(&g.rounds[&round_id]),
        Err(e) => error_response(&e),
    }
}

/// Reschedule a round (window re-validated against its championship).
#[put("/api/rounds/{id}")]
async fn api_update_round(state: AppState, path: Path<IdPath>, body: Json<UpdateRoundBody>) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    match update_round(&mut g, path.id, body.start_time, body.end_time) {
        Ok(()) => HttpResponse::Ok().json(&g.rounds[&path.id]),
        Err(e) => error_response(&e),
    }
}

#[delete("/api/rounds/{id}")]
async fn api_delete_round(state: AppState, path: Path<IdPath>) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    match delete_round(&mut g, path.id) {
        Ok(()) => HttpResponse::NoContent().finish(),
        Err(e) => error_response(&e),
    }
}

/// End an active round before its window closes.
#[post("/api/rounds/{id}/advance")]
async fn api_advance_round(state: AppState, path: Path<IdPath>) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    match advance_round(&mut g, path.id, Utc::now()) {
        Ok(()) => HttpResponse::Ok().json(&g.rounds[&path.id]),
        Err(e) => error_response(&e),
    }
}

#[get("/api/rounds/{id}/matches")]
async fn api_list_matches(state: AppState, path: Path<IdPath>) -> HttpResponse {
    let g = match state.read() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    if let Err(e) = g.round(path.id) {
        return error_response(&e);
    }
    HttpResponse::Ok().json(g.matches_of_round(path.id))
}

/// Retroactive score correction (admin).
#[put("/api/matches/{id}/score")]
async fn api_set_match_score(state: AppState, path: Path<IdPath>, body: Json<SetScoreBody>) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    match set_match_score(&mut g, path.id, body.score_team_a, body.score_team_b) {
        Ok(()) => HttpResponse::Ok().json(&g.matches[&path.id]),
        Err(e) => error_response(&e),
    }
}

/// Live feed: goal events of a match, newest first.
#[get("/api/matches/{id}/goals")]
async fn api_list_goals(state: AppState, path: Path<IdPath>, query: Query<LimitQuery>) -> HttpResponse {
    let g = match state.read() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    if let Err(e) = g.game_match(path.id) {
        return error_response(&e);
    }
    HttpResponse::Ok().json(g.goals_of_match(path.id, query.limit.unwrap_or(5)))
}

/// Scorer ranking for one match, derived from its goal events.
#[get("/api/matches/{id}/top-scorers")]
async fn api_top_scorers(state: AppState, path: Path<IdPath>, query: Query<LimitQuery>) -> HttpResponse {
    let g = match state.read() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    match match_top_scorers(&g, path.id, query.limit.unwrap_or(5)) {
        Ok(scorers) => HttpResponse::Ok().json(scorers),
        Err(e) => error_response(&e),
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let host = std::env::var("HOST").unwrap_or_else(|_| default_host());
    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or_else(default_port);
    let bind = (host.as_str(), port);
    log::info!("Starting server at http://{}:{}", bind.0, bind.1);

    let seed_demo = std::env::var("DEMO_SEED").map(|v| v == "1").unwrap_or(false);
    let store = if seed_demo {
        log::info!("Seeding demo clubs");
        GameStore::seed_demo()
    } else {
        GameStore::new()
    };
    let state = Data::new(RwLock::new(store));

    // Background task: sweep round statuses so scheduled rounds open and
    // expired rounds close even with no traffic.
    let state_sweep = state.clone();
    actix_web::rt::spawn(async move {
        let mut interval = actix_web::rt::time::interval(SWEEP_INTERVAL);
        loop {
            interval.tick().await;
            let mut g = match state_sweep.write() {
                Ok(guard) => guard,
                Err(_) => continue,
            };
            let transitions = sweep(&mut g, Utc::now());
            if transitions > 0 {
                log::info!("Applied {} round transition(s)", transitions);
            }
        }
    });

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .service(api_health)
            .service(api_register_user)
            .service(api_get_user)
            .service(api_update_user)
            .service(api_can_shoot)
            .service(api_shoot)
            .service(api_set_plan)
            .service(api_set_boost)
            .service(api_rankings)
            .service(api_list_teams)
            .service(api_create_team)
            .service(api_update_team)
            .service(api_delete_team)
            .service(api_list_levels)
            .service(api_replace_levels)
            .service(api_create_championship)
            .service(api_list_championships)
            .service(api_get_championship)
            .service(api_replace_championship_teams)
            .service(api_delete_championship)
            .service(api_standings)
            .service(api_list_rounds)
            .service(api_create_round)
            .service(api_update_round)
            .service(api_delete_round)
            .service(api_advance_round)
            .service(api_list_matches)
            .service(api_set_match_score)
            .service(api_list_goals)
            .service(api_top_scorers)
    })
    .bind(bind)?
    .run()
    .await
}
