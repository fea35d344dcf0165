//! Directory and file listing operations, including the paginated
//! directory fetch that merges out-of-order pages into a slot array.

use std::sync::{Arc, Mutex};

use serde_json::Value;

use super::{spawn_op, DiskClient};
use crate::errors::DiskError;
use crate::model::{decode_resource, decode_resources, MediaType, PreviewSize, Resource, ResourceType, SortKey};
use crate::path::DiskPath;
use crate::promise::{OnResult, Promise};
use crate::transport::{append_param, fetch_json, Method};

/// Page-size override used for follow-up page requests.
const FOLLOW_UP_PAGE_SIZE: usize = 100;

/// Optional query parameters accepted by the listing endpoints.
#[derive(Debug, Clone, Default)]
pub struct ListOptions {
    pub sort: Option<SortKey>,
    pub limit: Option<usize>,
    pub offset: Option<usize>,
    pub preview_size: Option<PreviewSize>,
    pub preview_crop: Option<bool>,
}

/// One decoded directory page, taken from the `_embedded` response object.
#[derive(Debug, Clone)]
pub struct ListingPage {
    /// The directory resource itself.
    pub dir: Resource,
    pub path: DiskPath,
    pub sort: Option<SortKey>,
    pub limit: usize,
    pub offset: usize,
    pub total: usize,
    pub items: Vec<Resource>,
}

/// Outcome of a single listing request.
#[derive(Debug, Clone)]
pub enum ListingOutcome {
    /// The path named a file; no page data exists.
    File(Resource),
    /// The path named a directory; one page of its contents.
    Listing(ListingPage),
    Failed(DiskError),
}

/// Outcome of a flat file-resource listing.
#[derive(Debug, Clone)]
pub enum FileListOutcome {
    Listing {
        items: Vec<Resource>,
        limit: Option<usize>,
        offset: Option<usize>,
    },
    Failed(DiskError),
}

/// Outcome of the recently-uploaded listing.
#[derive(Debug, Clone)]
pub enum LastUploadedOutcome {
    Listing { limit: usize, items: Vec<Resource> },
    Failed(DiskError),
}

impl DiskClient {
    /// List metainfo for a file or folder.
    ///
    /// Trash paths are served by the trash listing endpoint; app and disk
    /// paths by the regular one. The result carries a single page; use
    /// [`fetch_directory`](DiskClient::fetch_directory) to gather a complete
    /// directory.
    pub fn list_path(
        &self,
        path: &DiskPath,
        opts: &ListOptions,
        handler: Option<OnResult<ListingOutcome>>,
    ) -> Arc<Promise<ListingOutcome>> {
        let mut url = match path {
            DiskPath::App(_) | DiskPath::Disk(_) => format!(
                "{}/v1/disk/resources?path={}",
                self.base_url(),
                path.url_encoded()
            ),
            DiskPath::Trash(_) => format!(
                "{}/v1/disk/trash/resources/?path={}",
                self.base_url(),
                path.url_encoded()
            ),
        };
        append_list_params(&mut url, opts);
        self.list_url(url, handler)
    }

    /// List metainfo for a published file or folder by its public key or URL.
    pub fn list_public(
        &self,
        public_key: &str,
        path: Option<&str>,
        opts: &ListOptions,
        handler: Option<OnResult<ListingOutcome>>,
    ) -> Arc<Promise<ListingOutcome>> {
        let mut url = format!(
            "{}/v1/disk/public/resources?public_key={}",
            self.base_url(),
            urlencoding::encode(public_key)
        );
        append_param(&mut url, "path", path);
        append_list_params(&mut url, opts);
        self.list_url(url, handler)
    }

    fn list_url(
        &self,
        url: String,
        handler: Option<OnResult<ListingOutcome>>,
    ) -> Arc<Promise<ListingOutcome>> {
        let promise = Promise::with_handler(handler);
        let transport = self.transport();
        spawn_op(&promise, async move {
            match fetch_json(transport.as_ref(), &url, Method::Get, None).await {
                Err(err) => ListingOutcome::Failed(err),
                Ok((json, 200)) => decode_listing(json),
                Ok((json, status)) => {
                    ListingOutcome::Failed(DiskError::api(status, Some(Value::Object(json))))
                }
            }
        });
        promise
    }

    /// List file resources across the whole disk, flat and paginated.
    pub fn list_files(
        &self,
        media_type: Option<MediaType>,
        opts: &ListOptions,
        handler: Option<OnResult<FileListOutcome>>,
    ) -> Arc<Promise<FileListOutcome>> {
        let mut url = format!("{}/v1/disk/resources/files", self.base_url());
        append_param(&mut url, "limit", opts.limit);
        append_param(&mut url, "media_type", media_type);
        append_param(&mut url, "offset", opts.offset);
        append_param(&mut url, "preview_crop", opts.preview_crop);
        append_param(&mut url, "preview_size", opts.preview_size);
        append_param(&mut url, "sort", opts.sort);

        let promise = Promise::with_handler(handler);
        let transport = self.transport();
        spawn_op(&promise, async move {
            match fetch_json(transport.as_ref(), &url, Method::Get, None).await {
                Err(err) => FileListOutcome::Failed(err),
                Ok((json, 200)) => match decode_resources(json.get("items")) {
                    Some(items) => FileListOutcome::Listing {
                        items,
                        limit: read_usize(&json, "limit"),
                        offset: read_usize(&json, "offset"),
                    },
                    None => FileListOutcome::Failed(incomplete(&json)),
                },
                Ok((json, status)) => {
                    FileListOutcome::Failed(DiskError::api(status, Some(Value::Object(json))))
                }
            }
        });
        promise
    }

    /// List the most recently uploaded files.
    pub fn last_uploaded(
        &self,
        limit: Option<usize>,
        media_type: Option<MediaType>,
        preview_size: Option<PreviewSize>,
        preview_crop: Option<bool>,
        handler: Option<OnResult<LastUploadedOutcome>>,
    ) -> Arc<Promise<LastUploadedOutcome>> {
        let mut url = format!("{}/v1/disk/resources/last-uploaded", self.base_url());
        append_param(&mut url, "limit", limit);
        append_param(&mut url, "media_type", media_type);
        append_param(&mut url, "preview_size", preview_size);
        append_param(&mut url, "preview_crop", preview_crop);

        let promise = Promise::with_handler(handler);
        let transport = self.transport();
        spawn_op(&promise, async move {
            match fetch_json(transport.as_ref(), &url, Method::Get, None).await {
                Err(err) => LastUploadedOutcome::Failed(err),
                Ok((json, 200)) => match decode_resources(json.get("items")) {
                    Some(items) => LastUploadedOutcome::Listing {
                        limit: read_usize(&json, "limit").unwrap_or(0),
                        items,
                    },
                    None => LastUploadedOutcome::Failed(incomplete(&json)),
                },
                Ok((json, status)) => {
                    LastUploadedOutcome::Failed(DiskError::api(status, Some(Value::Object(json))))
                }
            }
        });
        promise
    }
}

fn append_list_params(url: &mut String, opts: &ListOptions) {
    append_param(url, "sort", opts.sort);
    append_param(url, "limit", opts.limit);
    append_param(url, "offset", opts.offset);
    append_param(url, "preview_size", opts.preview_size);
    append_param(url, "preview_crop", opts.preview_crop);
}

fn read_usize(json: &crate::model::JsonObject, key: &str) -> Option<usize> {
    json.get(key).and_then(Value::as_u64).map(|n| n as usize)
}

fn incomplete(json: &crate::model::JsonObject) -> DiskError {
    DiskError::decode(
        "incomplete JSON response",
        Value::Object(json.clone()).to_string(),
    )
}

fn decode_listing(json: crate::model::JsonObject) -> ListingOutcome {
    let root = Value::Object(json);
    let Some(dir) = decode_resource(&root) else {
        return ListingOutcome::Failed(decode_failure(&root));
    };
    match dir.kind {
        ResourceType::File => ListingOutcome::File(dir),
        ResourceType::Dir => match decode_page(dir, &root) {
            Some(page) => ListingOutcome::Listing(page),
            None => ListingOutcome::Failed(decode_failure(&root)),
        },
    }
}

fn decode_failure(root: &Value) -> DiskError {
    DiskError::decode("incomplete JSON response", root.to_string())
}

fn decode_page(dir: Resource, root: &Value) -> Option<ListingPage> {
    let embedded = root.get("_embedded")?.as_object()?;
    let path = DiskPath::parse(embedded.get("path")?.as_str()?);
    let sort = SortKey::parse(embedded.get("sort")?.as_str()?);
    let limit = embedded.get("limit")?.as_u64()? as usize;
    let offset = embedded.get("offset")?.as_u64()? as usize;
    let total = embedded.get("total")?.as_u64()? as usize;
    let items = decode_resources(embedded.get("items"))?;
    Some(ListingPage {
        dir,
        path,
        sort,
        limit,
        offset,
        total,
        items,
    })
}

// --- Paginated directory fetch ------------------------------------------

/// Live view over a directory's eventual full contents.
///
/// Slots are sized to the server-reported total and filled by index as pages
/// arrive, possibly out of order. Completeness is observed, not signalled:
/// check [`is_complete`](DirectorySlots::is_complete) or watch the
/// [`DirectoryFetch::completion`] promise.
#[derive(Debug, Clone)]
pub struct DirectorySlots {
    /// The directory resource itself.
    pub dir: Resource,
    pub path: DiskPath,
    pub total: usize,
    slots: Arc<Mutex<Vec<Option<Resource>>>>,
}

impl DirectorySlots {
    fn new(dir: Resource, path: DiskPath, total: usize) -> Self {
        Self {
            dir,
            path,
            total,
            slots: Arc::new(Mutex::new(vec![None; total])),
        }
    }

    /// Copy of the current slot contents, in server order.
    pub fn snapshot(&self) -> Vec<Option<Resource>> {
        self.lock().clone()
    }

    /// Number of filled slots.
    pub fn loaded(&self) -> usize {
        self.lock().iter().filter(|slot| slot.is_some()).count()
    }

    /// Number of still-empty slots.
    pub fn missing(&self) -> usize {
        self.total - self.loaded()
    }

    pub fn is_complete(&self) -> bool {
        self.lock().iter().all(|slot| slot.is_some())
    }

    /// Write a page's items at `[offset, offset + items.len())`, clamped to
    /// the allocated length.
    fn fill(&self, offset: usize, items: &[Resource]) {
        let mut slots = self.lock();
        for (index, item) in items.iter().enumerate() {
            match slots.get_mut(offset + index) {
                Some(slot) => *slot = Some(item.clone()),
                None => break,
            }
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<Option<Resource>>> {
        match self.slots.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

/// Progress notification for one arriving page.
#[derive(Debug, Clone)]
pub struct PageArrived {
    pub offset: usize,
    pub count: usize,
    /// Slots still empty after this page was merged.
    pub missing: usize,
}

/// Callback fired for every page merged into the slot array.
pub type PageSink = Arc<dyn Fn(PageArrived) + Send + Sync>;

/// Outcome of the primary (first-page) stage of a directory fetch.
#[derive(Debug, Clone)]
pub enum DirectoryOutcome {
    /// The path named a file; no slots exist.
    File(Resource),
    /// The path named a directory; the view fills as pages arrive.
    Directory(DirectorySlots),
    Failed(DiskError),
}

/// Outcome of the fill stage of a directory fetch.
#[derive(Debug, Clone)]
pub enum FillOutcome {
    /// Every issued page request has merged its items.
    Complete,
    /// A page request failed; its slots stay empty and are never retried.
    Failed(DiskError),
}

/// Handles to the two stages of a paginated directory fetch.
///
/// `result` settles as soon as the first page is decoded, mirroring the
/// behavior callers poll against; `completion` settles once the full set is
/// known to be merged (or the first page request has failed).
pub struct DirectoryFetch {
    pub result: Arc<Promise<DirectoryOutcome>>,
    pub completion: Arc<Promise<FillOutcome>>,
}

impl DiskClient {
    /// Fetch a directory's full contents through paginated listing requests.
    ///
    /// The first page settles `result` with a live [`DirectorySlots`] view.
    /// When the server reports more items than the first page carried,
    /// follow-up requests are issued at successive offsets (`limit`,
    /// `2*limit`, ...) with a fixed page-size override, re-using the
    /// server-reported sort key; their pages merge out of order into
    /// disjoint slot ranges. `page_sink`, when given, fires once per merged
    /// page. A failed page settles `completion` with the error and leaves
    /// its slots empty; data already merged is not retracted.
    pub fn fetch_directory(
        &self,
        path: &DiskPath,
        opts: &ListOptions,
        page_sink: Option<PageSink>,
    ) -> DirectoryFetch {
        let result = Promise::new();
        let completion = Promise::new();
        let client = self.clone();
        let path = path.clone();
        let opts = opts.clone();
        let result_task = Arc::clone(&result);
        let completion_task = Arc::clone(&completion);
        tokio::spawn(async move {
            match client.list_path(&path, &opts, None).value().await {
                ListingOutcome::Failed(err) => {
                    tracing::warn!(path = %path, error = %err, "directory listing failed");
                    result_task.set(DirectoryOutcome::Failed(err.clone()));
                    completion_task.set(FillOutcome::Failed(err));
                }
                ListingOutcome::File(resource) => {
                    result_task.set(DirectoryOutcome::File(resource));
                    completion_task.set(FillOutcome::Complete);
                }
                ListingOutcome::Listing(page) => {
                    let slots = DirectorySlots::new(page.dir.clone(), page.path.clone(), page.total);
                    slots.fill(page.offset, &page.items);
                    result_task.set(DirectoryOutcome::Directory(slots.clone()));
                    if let Some(sink) = &page_sink {
                        sink(PageArrived {
                            offset: page.offset,
                            count: page.items.len(),
                            missing: slots.missing(),
                        });
                    }
                    client
                        .fill_remaining(page, slots, page_sink, completion_task)
                        .await;
                }
            }
        });
        DirectoryFetch { result, completion }
    }

    async fn fill_remaining(
        &self,
        page: ListingPage,
        slots: DirectorySlots,
        page_sink: Option<PageSink>,
        completion: Arc<Promise<FillOutcome>>,
    ) {
        if page.total <= page.items.len() {
            completion.set(FillOutcome::Complete);
            return;
        }
        let step = page.limit.max(1);
        let mut pages = tokio::task::JoinSet::new();
        let mut offset = step;
        while offset < page.total {
            let client = self.clone();
            let path = page.path.clone();
            let follow_opts = ListOptions {
                sort: page.sort,
                limit: Some(FOLLOW_UP_PAGE_SIZE),
                offset: Some(offset),
                ..ListOptions::default()
            };
            let slots = slots.clone();
            let sink = page_sink.clone();
            let completion = Arc::clone(&completion);
            pages.spawn(async move {
                match client.list_path(&path, &follow_opts, None).value().await {
                    ListingOutcome::Listing(follow) => {
                        slots.fill(follow.offset, &follow.items);
                        if let Some(sink) = &sink {
                            sink(PageArrived {
                                offset: follow.offset,
                                count: follow.items.len(),
                                missing: slots.missing(),
                            });
                        }
                    }
                    ListingOutcome::File(_) => {
                        completion.set(FillOutcome::Failed(DiskError::decode(
                            "follow-up page named a file",
                            String::new(),
                        )));
                    }
                    ListingOutcome::Failed(err) => {
                        tracing::warn!(offset, error = %err, "follow-up page failed");
                        completion.set(FillOutcome::Failed(err));
                    }
                }
            });
            offset += step;
        }
        while pages.join_next().await.is_some() {}
        // No-op when a failed page already settled the promise.
        completion.set(FillOutcome::Complete);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_resource(name: &str) -> Resource {
        decode_resource(&json!({
            "type": "file",
            "name": name,
            "path": format!("disk:/photos/{name}"),
            "created": "2014-04-22T10:32:49+04:00",
            "modified": "2014-04-22T10:32:49+04:00"
        }))
        .unwrap()
    }

    fn empty_dir(total: usize) -> DirectorySlots {
        let dir = decode_resource(&json!({
            "type": "dir",
            "name": "photos",
            "path": "disk:/photos",
            "created": "2014-04-22T10:32:49+04:00",
            "modified": "2014-04-22T10:32:49+04:00"
        }))
        .unwrap();
        DirectorySlots::new(dir, DiskPath::disk("photos"), total)
    }

    // --- Slot placement ---

    #[test]
    fn fill_places_items_at_offset() {
        let slots = empty_dir(250);
        let first: Vec<_> = (0..100).map(|i| sample_resource(&format!("a{i}"))).collect();
        slots.fill(0, &first);
        assert_eq!(slots.loaded(), 100);
        assert!(!slots.is_complete());

        // Pages merge out of order into disjoint ranges.
        let tail: Vec<_> = (200..250).map(|i| sample_resource(&format!("a{i}"))).collect();
        slots.fill(200, &tail);
        let middle: Vec<_> = (100..200).map(|i| sample_resource(&format!("a{i}"))).collect();
        slots.fill(100, &middle);

        assert!(slots.is_complete());
        let snapshot = slots.snapshot();
        assert_eq!(snapshot.len(), 250);
        assert_eq!(snapshot[0].as_ref().unwrap().name, "a0");
        assert_eq!(snapshot[150].as_ref().unwrap().name, "a150");
        assert_eq!(snapshot[249].as_ref().unwrap().name, "a249");
    }

    #[test]
    fn fill_clamps_past_the_allocated_length() {
        let slots = empty_dir(3);
        let items: Vec<_> = (0..5).map(|i| sample_resource(&format!("x{i}"))).collect();
        slots.fill(2, &items);
        assert_eq!(slots.loaded(), 1);
        assert_eq!(slots.snapshot()[2].as_ref().unwrap().name, "x0");
    }

    #[test]
    fn zero_total_directory_is_immediately_complete() {
        let slots = empty_dir(0);
        assert!(slots.is_complete());
        assert_eq!(slots.missing(), 0);
    }

    // --- Page decoding ---

    #[test]
    fn decode_listing_rejects_missing_embedded() {
        let json = json!({
            "type": "dir",
            "name": "photos",
            "path": "disk:/photos",
            "created": "2014-04-22T10:32:49+04:00",
            "modified": "2014-04-22T10:32:49+04:00"
        });
        let outcome = decode_listing(json.as_object().unwrap().clone());
        assert!(matches!(
            outcome,
            ListingOutcome::Failed(DiskError::Decode { .. })
        ));
    }

    #[test]
    fn decode_listing_accepts_unknown_sort_value() {
        let json = json!({
            "type": "dir",
            "name": "photos",
            "path": "disk:/photos",
            "created": "2014-04-22T10:32:49+04:00",
            "modified": "2014-04-22T10:32:49+04:00",
            "_embedded": {
                "path": "disk:/photos",
                "sort": "starship",
                "limit": 20,
                "offset": 0,
                "total": 0,
                "items": []
            }
        });
        match decode_listing(json.as_object().unwrap().clone()) {
            ListingOutcome::Listing(page) => assert!(page.sort.is_none()),
            other => panic!("expected listing, got {other:?}"),
        }
    }
}
