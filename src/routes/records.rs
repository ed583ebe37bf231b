use actix_web::{web, HttpResponse};
use serde::{de::DeserializeOwned, Serialize};
use validator::Validate;
use crate::core::live_url;
use crate::models::{
    Attendance, AttendanceQuery, AttendanceResponse, Class, ClassQuery, Connection,
    ConnectionResponse, CreatedResponse, ListResponse, LiveSession, LiveSessionCreate,
    LiveSessionQuery, LiveSessionResponse, Reward, RewardQuery, Student, StudentQuery, Tutor,
    TutorQuery, Vacancy, VacancyQuery,
};
use crate::routes::{store_failure, validation_failed, AppState};
use crate::services::{to_document, Collection, DocumentStore, Filter, StoredDocument};

/// Configure the document CRUD routes
pub fn configure<S: DocumentStore>(cfg: &mut web::ServiceConfig) {
    cfg.route("/connect-tutor", web::post().to(connect_tutor::<S>))
        .service(
            web::resource("/tutors")
                .route(web::post().to(create_tutor::<S>))
                .route(web::get().to(list_tutors::<S>)),
        )
        .service(
            web::resource("/students")
                .route(web::post().to(create_student::<S>))
                .route(web::get().to(list_students::<S>)),
        )
        .service(
            web::resource("/classes")
                .route(web::post().to(create_class::<S>))
                .route(web::get().to(list_classes::<S>)),
        )
        .service(
            web::resource("/vacancies")
                .route(web::post().to(create_vacancy::<S>))
                .route(web::get().to(list_vacancies::<S>)),
        )
        .service(
            web::resource("/attendance")
                .route(web::post().to(mark_attendance::<S>))
                .route(web::get().to(list_attendance::<S>)),
        )
        .service(
            web::resource("/live-session")
                .route(web::post().to(create_live_session::<S>))
                .route(web::get().to(list_live_sessions::<S>)),
        )
        .service(
            web::resource("/rewards")
                .route(web::post().to(create_reward::<S>))
                .route(web::get().to(list_rewards::<S>)),
        );
}

/// Serialize and insert a record, mapping failures to a 500 response
async fn insert_record<S: DocumentStore, T: Serialize>(
    state: &AppState<S>,
    collection: Collection,
    record: &T,
) -> Result<String, HttpResponse> {
    let action = format!("insert into {}", collection);
    let document = to_document(record).map_err(|e| store_failure(&action, e))?;

    let id = state
        .store
        .insert(collection, document)
        .await
        .map_err(|e| store_failure(&action, e))?;

    tracing::info!("Created {} document {}", collection, id);
    Ok(id)
}

/// Query a collection and answer with its typed records
async fn list_records<S: DocumentStore, T: DeserializeOwned + Serialize>(
    state: &AppState<S>,
    collection: Collection,
    filter: Filter,
) -> HttpResponse {
    let records = match state.store.query(collection, &filter).await {
        Ok(documents) => documents
            .into_iter()
            .map(StoredDocument::into_record::<T>)
            .collect::<Result<Vec<_>, _>>(),
        Err(e) => Err(e),
    };

    match records {
        Ok(items) => {
            tracing::debug!("Listing {} {} documents", items.len(), collection);
            HttpResponse::Ok().json(ListResponse { items })
        }
        Err(e) => store_failure(&format!("query {}", collection), e),
    }
}

fn created(id: String) -> HttpResponse {
    HttpResponse::Ok().json(CreatedResponse {
        status: "ok".to_string(),
        id,
    })
}

/// Link a student to a tutor
///
/// POST /api/connect-tutor
async fn connect_tutor<S: DocumentStore>(
    state: web::Data<AppState<S>>,
    req: web::Json<Connection>,
) -> HttpResponse {
    if let Err(errors) = req.validate() {
        return validation_failed(errors);
    }

    match insert_record(&state, Collection::Connection, &*req).await {
        Ok(connection_id) => HttpResponse::Ok().json(ConnectionResponse {
            status: "ok".to_string(),
            connection_id,
        }),
        Err(response) => response,
    }
}

async fn create_tutor<S: DocumentStore>(
    state: web::Data<AppState<S>>,
    req: web::Json<Tutor>,
) -> HttpResponse {
    if let Err(errors) = req.validate() {
        return validation_failed(errors);
    }

    insert_record(&state, Collection::Tutor, &*req)
        .await
        .map_or_else(|response| response, created)
}

async fn list_tutors<S: DocumentStore>(
    state: web::Data<AppState<S>>,
    query: web::Query<TutorQuery>,
) -> HttpResponse {
    list_records::<S, Tutor>(&state, Collection::Tutor, query.to_filter()).await
}

async fn create_student<S: DocumentStore>(
    state: web::Data<AppState<S>>,
    req: web::Json<Student>,
) -> HttpResponse {
    if let Err(errors) = req.validate() {
        return validation_failed(errors);
    }

    insert_record(&state, Collection::Student, &*req)
        .await
        .map_or_else(|response| response, created)
}

async fn list_students<S: DocumentStore>(
    state: web::Data<AppState<S>>,
    query: web::Query<StudentQuery>,
) -> HttpResponse {
    list_records::<S, Student>(&state, Collection::Student, query.to_filter()).await
}

async fn create_class<S: DocumentStore>(
    state: web::Data<AppState<S>>,
    req: web::Json<Class>,
) -> HttpResponse {
    if let Err(errors) = req.validate() {
        return validation_failed(errors);
    }

    insert_record(&state, Collection::Class, &*req)
        .await
        .map_or_else(|response| response, created)
}

async fn list_classes<S: DocumentStore>(
    state: web::Data<AppState<S>>,
    query: web::Query<ClassQuery>,
) -> HttpResponse {
    list_records::<S, Class>(&state, Collection::Class, query.to_filter()).await
}

/// Post a vacancy
///
/// POST /api/vacancies
///
/// Request body:
/// ```json
/// {
///   "institution_id": "string",
///   "subject": "string",
///   "grade": 11,
///   "description": "string",
///   "status": "open|closed"
/// }
/// ```
async fn create_vacancy<S: DocumentStore>(
    state: web::Data<AppState<S>>,
    req: web::Json<Vacancy>,
) -> HttpResponse {
    if let Err(errors) = req.validate() {
        return validation_failed(errors);
    }

    insert_record(&state, Collection::Vacancy, &*req)
        .await
        .map_or_else(|response| response, created)
}

/// GET /api/vacancies?subject={subject}&grade={grade}&status={status}&institution_id={id}
async fn list_vacancies<S: DocumentStore>(
    state: web::Data<AppState<S>>,
    query: web::Query<VacancyQuery>,
) -> HttpResponse {
    list_records::<S, Vacancy>(&state, Collection::Vacancy, query.to_filter()).await
}

async fn mark_attendance<S: DocumentStore>(
    state: web::Data<AppState<S>>,
    req: web::Json<Attendance>,
) -> HttpResponse {
    if let Err(errors) = req.validate() {
        return validation_failed(errors);
    }

    match insert_record(&state, Collection::Attendance, &*req).await {
        Ok(attendance_id) => HttpResponse::Ok().json(AttendanceResponse {
            status: "ok".to_string(),
            attendance_id,
        }),
        Err(response) => response,
    }
}

async fn list_attendance<S: DocumentStore>(
    state: web::Data<AppState<S>>,
    query: web::Query<AttendanceQuery>,
) -> HttpResponse {
    list_records::<S, Attendance>(&state, Collection::Attendance, query.to_filter()).await
}

/// Create a live session and its placeholder link
///
/// POST /api/live-session
async fn create_live_session<S: DocumentStore>(
    state: web::Data<AppState<S>>,
    req: web::Json<LiveSessionCreate>,
) -> HttpResponse {
    if let Err(errors) = req.validate() {
        return validation_failed(errors);
    }

    let req = req.into_inner();
    let live_url = live_url(req.platform, &state.live_links, &req.class_id, &req.tutor_id);

    let session = LiveSession {
        class_id: req.class_id,
        tutor_id: req.tutor_id,
        topic: req.topic,
        platform: req.platform,
        live_url,
    };

    match insert_record(&state, Collection::LiveSession, &session).await {
        Ok(id) => HttpResponse::Ok().json(LiveSessionResponse {
            status: "ok".to_string(),
            id,
            live_url: session.live_url,
        }),
        Err(response) => response,
    }
}

async fn list_live_sessions<S: DocumentStore>(
    state: web::Data<AppState<S>>,
    query: web::Query<LiveSessionQuery>,
) -> HttpResponse {
    list_records::<S, LiveSession>(&state, Collection::LiveSession, query.to_filter()).await
}

async fn create_reward<S: DocumentStore>(
    state: web::Data<AppState<S>>,
    req: web::Json<Reward>,
) -> HttpResponse {
    if let Err(errors) = req.validate() {
        return validation_failed(errors);
    }

    insert_record(&state, Collection::Reward, &*req)
        .await
        .map_or_else(|response| response, created)
}

async fn list_rewards<S: DocumentStore>(
    state: web::Data<AppState<S>>,
    query: web::Query<RewardQuery>,
) -> HttpResponse {
    list_records::<S, Reward>(&state, Collection::Reward, query.to_filter()).await
}
