use std::collections::HashMap;
use std::convert::Infallible;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use warp::reply::Json;
use warp::Filter;

use crate::config::LifecycleConfig;
use crate::error::LifecycleError;
use crate::lifecycle::{PrescriptionService, QueryEngine};
use crate::model::{PrescriptionInput, PrescriptionStatus};

#[derive(Debug, Deserialize)]
pub struct StatusUpdateRequest {
    pub status: PrescriptionStatus,
    pub actor: String,
    pub note: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ValidateRequest {
    pub actor: String,
    pub notes: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse {
    pub status: String,
    pub message: String,
    pub data: Option<serde_json::Value>,
}

fn success(message: &str, data: Option<serde_json::Value>) -> Json {
    warp::reply::json(&ApiResponse {
        status: "success".to_string(),
        message: message.to_string(),
        data,
    })
}

fn failure(message: String) -> Json {
    warp::reply::json(&ApiResponse {
        status: "error".to_string(),
        message,
        data: None,
    })
}

pub struct RestApi {
    service: Arc<PrescriptionService>,
    query_engine: Arc<QueryEngine>,
    lifecycle: LifecycleConfig,
}

impl RestApi {
    pub fn new(
        service: Arc<PrescriptionService>,
        query_engine: Arc<QueryEngine>,
        lifecycle: LifecycleConfig,
    ) -> Self {
        RestApi {
            service,
            query_engine,
            lifecycle,
        }
    }

    pub fn routes(&self) -> impl Filter<Extract = impl warp::Reply, Error = warp::Rejection> + Clone {
        self.create_prescription()
            .or(self.list_prescriptions())
            .or(self.overdue_prescriptions())
            .or(self.prescription_stats())
            .or(self.update_status())
            .or(self.validate_prescription())
            .or(self.list_alerts())
            .or(self.run_monitoring())
            .or(self.lifecycle_config())
    }

    fn create_prescription(
        &self,
    ) -> impl Filter<Extract = impl warp::Reply, Error = warp::Rejection> + Clone {
        let service = Arc::clone(&self.service);

        warp::path!("prescriptions")
            .and(warp::post())
            .and(warp::body::json())
            .and_then(move |input: PrescriptionInput| {
                let service = Arc::clone(&service);
                async move {
                    match service.create_prescription(input) {
                        Ok(prescription) => Ok::<Json, Infallible>(success(
                            "Prescription created",
                            Some(serde_json::to_value(prescription).unwrap()),
                        )),
                        Err(LifecycleError::Validation(msg)) => {
                            Ok(failure(format!("Invalid prescription: {}", msg)))
                        }
                        Err(err) => Ok(failure(format!("Failed to create prescription: {}", err))),
                    }
                }
            })
    }

    fn list_prescriptions(
        &self,
    ) -> impl Filter<Extract = impl warp::Reply, Error = warp::Rejection> + Clone {
        let query_engine = Arc::clone(&self.query_engine);

        warp::path!("prescriptions")
            .and(warp::get())
            .and(warp::query::<HashMap<String, String>>())
            .and_then(move |params: HashMap<String, String>| {
                let query_engine = Arc::clone(&query_engine);
                async move {
                    let result = if let Some(q) = params.get("q") {
                        query_engine.search(q)
                    } else if let Some(raw) = params.get("status") {
                        match PrescriptionStatus::parse(raw) {
                            Some(status) => query_engine.by_status(status),
                            None => {
                                return Ok::<Json, Infallible>(failure(format!(
                                    "Unknown status: {}",
                                    raw
                                )))
                            }
                        }
                    } else {
                        query_engine.all()
                    };

                    match result {
                        Ok(prescriptions) => Ok(success(
                            "Prescriptions",
                            Some(serde_json::to_value(prescriptions).unwrap()),
                        )),
                        Err(err) => Ok(failure(format!("Query failed: {}", err))),
                    }
                }
            })
    }

    fn overdue_prescriptions(
        &self,
    ) -> impl Filter<Extract = impl warp::Reply, Error = warp::Rejection> + Clone {
        let query_engine = Arc::clone(&self.query_engine);

        warp::path!("prescriptions" / "overdue")
            .and(warp::get())
            .and_then(move || {
                let query_engine = Arc::clone(&query_engine);
                async move {
                    match query_engine.overdue() {
                        Ok(prescriptions) => Ok::<Json, Infallible>(success(
                            "Overdue prescriptions",
                            Some(serde_json::to_value(prescriptions).unwrap()),
                        )),
                        Err(err) => Ok(failure(format!("Query failed: {}", err))),
                    }
                }
            })
    }

    fn prescription_stats(
        &self,
    ) -> impl Filter<Extract = impl warp::Reply, Error = warp::Rejection> + Clone {
        let query_engine = Arc::clone(&self.query_engine);

        warp::path!("prescriptions" / "stats")
            .and(warp::get())
            .and_then(move || {
                let query_engine = Arc::clone(&query_engine);
                async move {
                    match query_engine.stats() {
                        Ok(stats) => Ok::<Json, Infallible>(success(
                            "Prescription statistics",
                            Some(serde_json::to_value(stats).unwrap()),
                        )),
                        Err(err) => Ok(failure(format!("Query failed: {}", err))),
                    }
                }
            })
    }

    fn update_status(
        &self,
    ) -> impl Filter<Extract = impl warp::Reply, Error = warp::Rejection> + Clone {
        let service = Arc::clone(&self.service);

        warp::path!("prescriptions" / String / "status")
            .and(warp::post())
            .and(warp::body::json())
            .and_then(move |id: String, request: StatusUpdateRequest| {
                let service = Arc::clone(&service);
                async move {
                    match service.update_status(
                        &id,
                        request.status,
                        &request.actor,
                        request.note.as_deref(),
                    ) {
                        Ok(true) => Ok::<Json, Infallible>(success("Status updated", None)),
                        Ok(false) => Ok(failure(
                            "Prescription not found or transition not allowed".to_string(),
                        )),
                        Err(err) => Ok(failure(format!("Failed to update status: {}", err))),
                    }
                }
            })
    }

    fn validate_prescription(
        &self,
    ) -> impl Filter<Extract = impl warp::Reply, Error = warp::Rejection> + Clone {
        let service = Arc::clone(&self.service);

        warp::path!("prescriptions" / String / "validate")
            .and(warp::post())
            .and(warp::body::json())
            .and_then(move |id: String, request: ValidateRequest| {
                let service = Arc::clone(&service);
                async move {
                    match service.validate_prescription(&id, &request.actor, request.notes.as_deref())
                    {
                        Ok(true) => Ok::<Json, Infallible>(success("Prescription validated", None)),
                        Ok(false) => Ok(failure("Prescription not found".to_string())),
                        Err(err) => Ok(failure(format!("Failed to validate: {}", err))),
                    }
                }
            })
    }

    fn list_alerts(&self) -> impl Filter<Extract = impl warp::Reply, Error = warp::Rejection> + Clone {
        let service = Arc::clone(&self.service);

        warp::path!("alerts")
            .and(warp::get())
            .and_then(move || {
                let service = Arc::clone(&service);
                async move {
                    match service.alerts() {
                        Ok(alerts) => Ok::<Json, Infallible>(success(
                            "Alerts",
                            Some(serde_json::to_value(alerts).unwrap()),
                        )),
                        Err(err) => Ok(failure(format!("Query failed: {}", err))),
                    }
                }
            })
    }

    /// Trigger one monitoring sweep. Wired to an external scheduler; the
    /// engine itself keeps no timers.
    fn run_monitoring(
        &self,
    ) -> impl Filter<Extract = impl warp::Reply, Error = warp::Rejection> + Clone {
        let service = Arc::clone(&self.service);

        warp::path!("monitoring" / "run")
            .and(warp::post())
            .and_then(move || {
                let service = Arc::clone(&service);
                async move {
                    match service.perform_automated_monitoring() {
                        Ok(outcome) => {
                            println!(
                                "Monitoring sweep: {} overdue alert(s), {} expired",
                                outcome.overdue_alerts, outcome.expired
                            );
                            Ok::<Json, Infallible>(success(
                                "Monitoring sweep complete",
                                Some(serde_json::json!({
                                    "overdue_alerts": outcome.overdue_alerts,
                                    "expired": outcome.expired,
                                })),
                            ))
                        }
                        Err(err) => Ok(failure(format!("Monitoring failed: {}", err))),
                    }
                }
            })
    }

    /// Read-only view of the named lifecycle constants, so the form
    /// validation layer shares one source of truth with the engine.
    fn lifecycle_config(
        &self,
    ) -> impl Filter<Extract = impl warp::Reply, Error = warp::Rejection> + Clone {
        let lifecycle = self.lifecycle.clone();

        warp::path!("lifecycle" / "config")
            .and(warp::get())
            .map(move || {
                success(
                    "Lifecycle configuration",
                    Some(serde_json::to_value(&lifecycle).unwrap()),
                )
            })
    }
}
