use std::collections::HashMap;

use axum::body::Bytes;
use axum::extract::rejection::BytesRejection;
use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Extension;
use serde::Serialize;
use serde_json::json;
use taxii_engine::{Envelope, IngestOutcome, StatusRead};
use taxii_types::{ApiRootInfo, Bundle, Collection, Discovery, Manifest, ObjectRecord};

use crate::auth::Identity;
use crate::error::{ServerError, ServerResult};
use crate::media::{require_taxii_content, TaxiiJson};
use crate::state::AppState;

type Params = Query<HashMap<String, String>>;

async fn ensure_root(state: &AppState, root: &str) -> ServerResult<()> {
    if state.engine.registry.root_exists(root).await? {
        Ok(())
    } else {
        Err(ServerError::RootNotFound(root.to_string()))
    }
}

async fn ensure_collection(state: &AppState, root: &str, collection_id: &str) -> ServerResult<()> {
    ensure_root(state, root).await?;
    if state.engine.registry.collection_exists(root, collection_id).await? {
        Ok(())
    } else {
        Err(ServerError::CollectionNotFound(collection_id.to_string()))
    }
}

/// GET /taxii2/
pub async fn discovery(State(state): State<AppState>) -> ServerResult<TaxiiJson<Discovery>> {
    let discovery = state
        .engine
        .registry
        .discovery()
        .await?
        .ok_or(ServerError::DiscoveryNotConfigured)?;
    Ok(TaxiiJson(discovery))
}

/// GET /{root}/
pub async fn api_root(
    State(state): State<AppState>,
    Path(root): Path<String>,
) -> ServerResult<TaxiiJson<ApiRootInfo>> {
    ensure_root(&state, &root).await?;
    let info = state
        .engine
        .registry
        .root_information(&root)
        .await?
        .ok_or_else(|| ServerError::RootNotFound(root.clone()))?;
    Ok(TaxiiJson(info))
}

#[derive(Debug, Serialize)]
pub struct CollectionList {
    pub collections: Vec<Collection>,
}

/// GET /{root}/collections/
pub async fn collections(
    State(state): State<AppState>,
    Path(root): Path<String>,
) -> ServerResult<TaxiiJson<CollectionList>> {
    ensure_root(&state, &root).await?;
    let collections = state.engine.collections.list(&root).await?;
    Ok(TaxiiJson(CollectionList { collections }))
}

/// GET /{root}/collections/{id}/
pub async fn collection(
    State(state): State<AppState>,
    Path((root, collection_id)): Path<(String, String)>,
) -> ServerResult<TaxiiJson<Collection>> {
    ensure_collection(&state, &root, &collection_id).await?;
    let collection = state
        .engine
        .collections
        .get(&root, &collection_id)
        .await?
        .ok_or_else(|| ServerError::CollectionNotFound(collection_id.clone()))?;
    Ok(TaxiiJson(collection))
}

/// GET /{root}/collections/{id}/objects/
pub async fn objects(
    State(state): State<AppState>,
    Path((root, collection_id)): Path<(String, String)>,
    Query(params): Params,
) -> ServerResult<TaxiiJson<Envelope<ObjectRecord>>> {
    ensure_collection(&state, &root, &collection_id).await?;
    let filter = state.engine.resolve_filter(&params)?;
    let page = state
        .engine
        .objects
        .list_objects(&root, &collection_id, &filter)
        .await?;
    Ok(TaxiiJson(page.into_envelope(None)))
}

/// POST /{root}/collections/{id}/objects/
pub async fn add_objects(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Path((root, collection_id)): Path<(String, String)>,
    headers: HeaderMap,
    body: Result<Bytes, BytesRejection>,
) -> ServerResult<Response> {
    ensure_collection(&state, &root, &collection_id).await?;
    require_taxii_content(&headers)?;

    let info = state
        .engine
        .registry
        .root_information(&root)
        .await?
        .ok_or_else(|| ServerError::RootNotFound(root.clone()))?;
    let max = info.max_content_length;
    // The router-wide buffer limit can trip before the per-root check.
    let body = body.map_err(|rejection| match rejection.status() {
        StatusCode::PAYLOAD_TOO_LARGE => ServerError::PayloadTooLarge { max },
        _ => ServerError::UnreadableBody(rejection.body_text()),
    })?;
    if body.len() as u64 > max {
        return Err(ServerError::PayloadTooLarge { max });
    }

    let bundle = Bundle::from_slice(&body)?;
    tracing::info!(
        user = %identity.name,
        api_root = %root,
        collection_id = %collection_id,
        entries = bundle.len(),
        "add objects"
    );

    let outcome = state
        .engine
        .objects
        .add_objects(&root, &collection_id, bundle)
        .await?;
    match outcome {
        IngestOutcome::Accepted(status) => {
            Ok((StatusCode::ACCEPTED, TaxiiJson(status)).into_response())
        }
        IngestOutcome::NothingToIngest => Ok(StatusCode::NO_CONTENT.into_response()),
        IngestOutcome::CollectionMissing { .. } => {
            Err(ServerError::CollectionNotFound(collection_id))
        }
    }
}

/// GET /{root}/collections/{id}/objects/{object_id}/
pub async fn object(
    State(state): State<AppState>,
    Path((root, collection_id, object_id)): Path<(String, String, String)>,
    Query(params): Params,
) -> ServerResult<TaxiiJson<Envelope<ObjectRecord>>> {
    ensure_collection(&state, &root, &collection_id).await?;
    let filter = state.engine.resolve_filter(&params)?;
    let page = state
        .engine
        .objects
        .get_object(&root, &collection_id, &object_id, &filter)
        .await?;
    Ok(TaxiiJson(page.into_envelope(Some(object_id))))
}

/// DELETE /{root}/collections/{id}/objects/{object_id}/
pub async fn delete_object(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Path((root, collection_id, object_id)): Path<(String, String, String)>,
    Query(params): Params,
) -> ServerResult<TaxiiJson<serde_json::Value>> {
    ensure_collection(&state, &root, &collection_id).await?;
    let filter = state.engine.resolve_filter(&params)?;
    let deleted = state
        .engine
        .objects
        .delete_object(&root, &collection_id, &object_id, &filter)
        .await?;
    tracing::info!(
        user = %identity.name,
        api_root = %root,
        collection_id = %collection_id,
        object_id = %object_id,
        deleted,
        "delete object"
    );
    Ok(TaxiiJson(json!({ "delete_count": deleted })))
}

/// GET /{root}/collections/{id}/objects/{object_id}/versions/
pub async fn object_versions(
    State(state): State<AppState>,
    Path((root, collection_id, object_id)): Path<(String, String, String)>,
    Query(params): Params,
) -> ServerResult<TaxiiJson<Envelope<String>>> {
    ensure_collection(&state, &root, &collection_id).await?;
    let filter = state.engine.resolve_filter(&params)?;
    let page = state
        .engine
        .objects
        .object_versions(&root, &collection_id, &object_id, &filter)
        .await?;
    Ok(TaxiiJson(page.into_envelope(Some(object_id))))
}

/// GET /{root}/collections/{id}/manifest/
pub async fn manifest(
    State(state): State<AppState>,
    Path((root, collection_id)): Path<(String, String)>,
    Query(params): Params,
) -> ServerResult<TaxiiJson<Envelope<Manifest>>> {
    ensure_collection(&state, &root, &collection_id).await?;
    let filter = state.engine.resolve_filter(&params)?;
    let page = state
        .engine
        .objects
        .list_manifests(&root, &collection_id, &filter)
        .await?;
    Ok(TaxiiJson(page.into_envelope(None)))
}

/// GET /{root}/status/{status_id}/
///
/// An unknown or exhausted record yields the JSON string `"Deleted"`.
pub async fn status(
    State(state): State<AppState>,
    Path((root, status_id)): Path<(String, String)>,
) -> ServerResult<TaxiiJson<StatusRead>> {
    ensure_root(&state, &root).await?;
    let read = state.engine.status.read(&root, &status_id).await?;
    Ok(TaxiiJson(read))
}
