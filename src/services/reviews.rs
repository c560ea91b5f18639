//! Review listing, CRUD, file ingestion and the analysis stub.

use actix_multipart::form::tempfile::TempFile;
use serde_json::{Map, Value};

use crate::domain::directory::DirectoryKind;
use crate::domain::product::Product;
use crate::domain::review::{NewReview, Review, ReviewDraft, UpdateReview};
use crate::dto::reviews::{
    AnalysisOutcome, AnalyzePageData, ReviewDeleted, ReviewSaved, ReviewsCleared, UploadReport,
};
use crate::forms::review::{AnalyzeForm, ReviewForm};
use crate::models::auth::AuthenticatedUser;
use crate::repository::{
    DirectoryReader, ProductReader, ProductWriter, ReviewListQuery, ReviewReader, ReviewWriter,
};
use crate::services::{ServiceError, ServiceResult, owns, visibility_scope};
use crate::table::{Page, TableState};

/// Loads the analyze page frame: the product and the prompt list for the
/// analysis picker. Review rows come from [`analyze_data`].
pub fn load_analyze_page<R>(
    repo: &R,
    user: &AuthenticatedUser,
    product_id: i32,
) -> ServiceResult<AnalyzePageData>
where
    R: ProductReader + DirectoryReader + ?Sized,
{
    let product = fetch_product(repo, user, product_id)?;
    let prompts = repo.list_directory_entries(DirectoryKind::Prompt, visibility_scope(user))?;

    Ok(AnalyzePageData { product, prompts })
}

/// The review page the table state describes.
pub fn analyze_data<R>(
    repo: &R,
    user: &AuthenticatedUser,
    product_id: i32,
    state: &TableState,
) -> ServiceResult<Page<Review>>
where
    R: ReviewReader + ?Sized,
{
    let mut query = ReviewListQuery::from_state(product_id, state);
    if let Some(user_id) = visibility_scope(user) {
        query = query.owner(user_id);
    }

    let (total, items) = repo.list_reviews(query).map_err(|err| {
        log::error!("Failed to list reviews: {err}");
        err
    })?;

    Ok(Page::new(items, total, state))
}

/// Adds one review to the product.
pub fn add_review<R>(
    repo: &R,
    user: &AuthenticatedUser,
    product_id: i32,
    form: ReviewForm,
) -> ServiceResult<ReviewSaved>
where
    R: ProductReader + ReviewWriter + ?Sized,
{
    fetch_product(repo, user, product_id)?;

    let new_review = NewReview::from_draft(product_id, user.user_id, form.into())
        .map_err(|problems| ServiceError::Form(problems.join("; ")))?;

    let review = repo.create_review(&new_review).map_err(|err| {
        log::error!("Failed to create review: {err}");
        ServiceError::from(err)
    })?;

    Ok(ReviewSaved::new(review.id))
}

/// Edits a review. Rows of other owners look exactly like missing ones.
pub fn update_review<R>(
    repo: &R,
    user: &AuthenticatedUser,
    review_id: i32,
    form: ReviewForm,
) -> ServiceResult<ReviewSaved>
where
    R: ReviewReader + ReviewWriter + ?Sized,
{
    let review = repo
        .get_review_by_id(review_id)?
        .ok_or(ServiceError::NotFound)?;
    if !owns(user, review.user_id) {
        return Err(ServiceError::NotFound);
    }

    let updates = UpdateReview::from_draft(form.into())
        .map_err(|problems| ServiceError::Form(problems.join("; ")))?;

    let review = repo.update_review(review.id, &updates).map_err(|err| {
        log::error!("Failed to update review: {err}");
        ServiceError::from(err)
    })?;

    Ok(ReviewSaved::new(review.id))
}

/// Deletes a review. Rows of other owners look exactly like missing ones.
pub fn delete_review<R>(
    repo: &R,
    user: &AuthenticatedUser,
    review_id: i32,
) -> ServiceResult<ReviewDeleted>
where
    R: ReviewReader + ReviewWriter + ?Sized,
{
    let review = repo
        .get_review_by_id(review_id)?
        .ok_or(ServiceError::NotFound)?;
    if !owns(user, review.user_id) {
        return Err(ServiceError::NotFound);
    }

    repo.delete_review(review.id).map_err(|err| {
        log::error!("Failed to delete review: {err}");
        ServiceError::from(err)
    })?;

    Ok(ReviewDeleted {
        success: true,
        deleted_id: review.id,
    })
}

/// Deletes the product's reviews within the caller's visibility.
pub fn clear_reviews<R>(
    repo: &R,
    user: &AuthenticatedUser,
    product_id: i32,
) -> ServiceResult<ReviewsCleared>
where
    R: ReviewWriter + ?Sized,
{
    let deleted = repo
        .delete_reviews_for_product(product_id, visibility_scope(user))
        .map_err(|err| {
            log::error!("Failed to clear reviews: {err}");
            ServiceError::from(err)
        })?;

    Ok(ReviewsCleared::new(deleted))
}

/// Ingests a CSV or JSON review file. Valid rows are inserted in one
/// batch; every rejected row is reported back by line number.
pub fn upload_reviews<R>(
    repo: &R,
    user: &AuthenticatedUser,
    product_id: i32,
    file: &TempFile,
) -> ServiceResult<UploadReport>
where
    R: ProductReader + ReviewReader + ReviewWriter + ?Sized,
{
    fetch_product(repo, user, product_id)?;

    let mut errors = Vec::new();
    let mut total_rows = 0;
    let mut empty_rows = 0;
    let mut rows = Vec::new();

    match read_drafts(file)? {
        Ok(drafts) => {
            total_rows = drafts.len();
            for (index, draft) in drafts.into_iter().enumerate() {
                let line = index + 1;
                if draft.is_blank() {
                    empty_rows += 1;
                    errors.push(format!(
                        "Строка #{line}: не содержит значимых данных, не загружена"
                    ));
                    continue;
                }
                match NewReview::from_draft(product_id, user.user_id, draft) {
                    Ok(row) => rows.push(row),
                    Err(problems) => errors.extend(
                        problems
                            .into_iter()
                            .map(|problem| format!("Строка #{line}: {problem}")),
                    ),
                }
            }
        }
        Err(message) => errors.push(message),
    }

    if !rows.is_empty() {
        repo.create_reviews(&rows).map_err(|err| {
            log::error!("Failed to insert uploaded reviews: {err}");
            ServiceError::from(err)
        })?;
    }

    let mut query = ReviewListQuery::new(product_id).paginate(1, 1);
    if let Some(user_id) = visibility_scope(user) {
        query = query.owner(user_id);
    }
    let (total, _) = repo.list_reviews(query)?;

    Ok(UploadReport {
        status: "ok",
        success_count: rows.len(),
        total_rows,
        empty_rows,
        errors,
        total,
    })
}

/// Runs the keyword analysis over the filtered reviews and stores the
/// summary on the product.
pub fn analyze<R>(
    repo: &R,
    user: &AuthenticatedUser,
    product_id: i32,
    form: &AnalyzeForm,
) -> ServiceResult<AnalysisOutcome>
where
    R: ProductReader + ProductWriter + ReviewReader + ?Sized,
{
    fetch_product(repo, user, product_id)?;

    let mut query = ReviewListQuery::new(product_id);
    if let Some(user_id) = visibility_scope(user) {
        query = query.owner(user_id);
    }
    // Zero and empty string mean the filter is off.
    query.importance = form.importance.filter(|v| *v != 0);
    query.source = form.source.clone().filter(|s| !s.is_empty());
    query.text = form.text.clone().filter(|s| !s.is_empty());
    query.advantages = form.advantages.clone().filter(|s| !s.is_empty());
    query.disadvantages = form.disadvantages.clone().filter(|s| !s.is_empty());
    query.rating_min = form.normalized_rating_min.filter(|v| *v != 0);
    query.rating_max = form.normalized_rating_max.filter(|v| *v != 0);

    let (_, reviews) = repo.list_reviews(query).map_err(|err| {
        log::error!("Failed to list reviews for analysis: {err}");
        err
    })?;

    let result = summarize(&reviews);
    repo.set_analysis_result(product_id, &result).map_err(|err| {
        log::error!("Failed to store analysis result: {err}");
        ServiceError::from(err)
    })?;

    Ok(AnalysisOutcome { result })
}

/// Counts positive and negative keyword mentions per review. Stands in
/// for an external model, so the output is deterministic.
fn summarize(reviews: &[Review]) -> String {
    let mut positives = 0i32;
    let mut negatives = 0i32;
    for review in reviews {
        let body = [&review.text, &review.advantages, &review.disadvantages]
            .iter()
            .filter_map(|part| part.as_deref())
            .collect::<Vec<_>>()
            .join(" ")
            .to_lowercase();
        if body.contains("хорош") || body.contains("отличн") {
            positives += 1;
        }
        if body.contains("плох") || body.contains("ужасн") {
            negatives += 1;
        }
    }
    let total = reviews.len() as i32;
    format!(
        "Итоговый анализ (заглушка):\nВсего отзывов: {total}\nПозитивных: {positives}\nНегативных: {negatives}\nНейтральных: {}",
        total - positives - negatives
    )
}

/// The product, if it exists and the caller may touch it.
fn fetch_product<R>(
    repo: &R,
    user: &AuthenticatedUser,
    product_id: i32,
) -> ServiceResult<Product>
where
    R: ProductReader + ?Sized,
{
    let product = repo
        .get_product_by_id(product_id)?
        .ok_or(ServiceError::NotFound)?;
    if !owns(user, product.user_id) {
        return Err(ServiceError::Unauthorized);
    }
    Ok(product)
}

/// Reads an uploaded file into draft rows. The outer error is an I/O
/// failure, the inner one a malformed file reported back to the client.
fn read_drafts(file: &TempFile) -> ServiceResult<Result<Vec<ReviewDraft>, String>> {
    let ext = file
        .file_name
        .as_deref()
        .unwrap_or_default()
        .rsplit('.')
        .next()
        .unwrap_or_default()
        .to_lowercase();

    match ext.as_str() {
        "json" | "csv" => {}
        _ => return Ok(Err("Формат файла должен быть .json или .csv".to_string())),
    }

    let bytes = std::fs::read(file.file.path()).map_err(|err| {
        log::error!("Failed to read uploaded file: {err}");
        ServiceError::Io(err)
    })?;

    if ext == "json" {
        Ok(decode_json(&bytes))
    } else {
        Ok(decode_csv(&bytes))
    }
}

fn decode_json(bytes: &[u8]) -> Result<Vec<ReviewDraft>, String> {
    let rows: Vec<Map<String, Value>> =
        serde_json::from_slice(bytes).map_err(|err| format!("Ошибка парсинга JSON: {err}"))?;
    Ok(rows.iter().map(draft_from_json).collect())
}

fn decode_csv(bytes: &[u8]) -> Result<Vec<ReviewDraft>, String> {
    let mut reader = csv::Reader::from_reader(bytes);
    let headers = reader
        .headers()
        .map_err(|err| format!("Ошибка парсинга CSV: {err}"))?
        .clone();

    let mut drafts = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|err| format!("Ошибка парсинга CSV: {err}"))?;
        drafts.push(draft_from_csv(&headers, &record));
    }
    Ok(drafts)
}

fn draft_from_csv(headers: &csv::StringRecord, record: &csv::StringRecord) -> ReviewDraft {
    let mut draft = ReviewDraft::default();
    for (i, field) in record.iter().enumerate() {
        match headers.get(i).map(str::trim) {
            Some("importance") => draft.importance = parse_int(field),
            Some("source") => draft.source = non_empty(field),
            Some("text") => draft.text = non_empty(field),
            Some("advantages") => draft.advantages = non_empty(field),
            Some("disadvantages") => draft.disadvantages = non_empty(field),
            Some("raw_rating") => draft.raw_rating = non_empty(field),
            Some("rating") => draft.rating = parse_float(field),
            Some("max_rating") => draft.max_rating = parse_float(field),
            _ => {}
        }
    }
    draft
}

fn draft_from_json(row: &Map<String, Value>) -> ReviewDraft {
    ReviewDraft {
        importance: json_int(json_field(row, "importance")),
        source: json_text(json_field(row, "source")),
        text: json_text(json_field(row, "text")),
        advantages: json_text(json_field(row, "advantages")),
        disadvantages: json_text(json_field(row, "disadvantages")),
        raw_rating: json_text(json_field(row, "raw_rating")),
        rating: json_float(json_field(row, "rating")),
        max_rating: json_float(json_field(row, "max_rating")),
    }
}

/// Keys arrive from hand-edited files, so they are matched trimmed.
fn json_field<'a>(row: &'a Map<String, Value>, key: &str) -> Option<&'a Value> {
    row.iter().find(|(k, _)| k.trim() == key).map(|(_, v)| v)
}

fn json_int(value: Option<&Value>) -> Option<i32> {
    match value? {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|v| v as i64))
            .map(|v| v as i32),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn json_float(value: Option<&Value>) -> Option<f64> {
    match value? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => parse_float(s),
        _ => None,
    }
}

fn json_text(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn non_empty(field: &str) -> Option<String> {
    (!field.is_empty()).then(|| field.to_string())
}

fn parse_int(field: &str) -> Option<i32> {
    field.trim().parse().ok()
}

fn parse_float(field: &str) -> Option<f64> {
    field.trim().replace(',', ".").parse().ok()
}

#[cfg(all(test, feature = "test-mocks"))]
mod tests {
    use std::io::Write;

    use super::*;
    use crate::repository::mock::MockRepository;
    use crate::table::TableDefaults;

    fn plain_user() -> AuthenticatedUser {
        AuthenticatedUser {
            sub: "alice".to_string(),
            user_id: 7,
            is_superuser: false,
            exp: 0,
        }
    }

    fn superuser() -> AuthenticatedUser {
        AuthenticatedUser {
            sub: "root".to_string(),
            user_id: 1,
            is_superuser: true,
            exp: 0,
        }
    }

    fn review_state() -> TableState {
        TableState::new(TableDefaults::new().filter_keys(&[
            "importance",
            "source",
            "text",
            "advantages",
            "disadvantages",
            "normalized_rating_min",
            "normalized_rating_max",
        ]))
    }

    fn owned_product(id: i32, user_id: i32) -> Product {
        Product {
            id,
            user_id,
            name: Some("Сок".to_string()),
            ..Product::default()
        }
    }

    fn review_with_text(text: &str) -> Review {
        Review {
            text: Some(text.to_string()),
            ..Review::default()
        }
    }

    fn temp_upload(name: &str, contents: &[u8]) -> TempFile {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        file.write_all(contents).expect("write payload");
        TempFile {
            file,
            content_type: None,
            file_name: Some(name.to_string()),
            size: contents.len(),
        }
    }

    #[test]
    fn analyze_data_scopes_to_owner() {
        let mut repo = MockRepository::new();
        repo.expect_list_reviews()
            .withf(|query| query.product_id == 5 && query.user_id == Some(7))
            .times(1)
            .returning(|_| Ok((0, vec![])));

        let page = analyze_data(&repo, &plain_user(), 5, &review_state())
            .expect("should list reviews");
        assert!(page.is_empty());
    }

    #[test]
    fn add_review_rejects_bad_fields_before_insert() {
        let mut repo = MockRepository::new();
        repo.expect_get_product_by_id()
            .returning(|_| Ok(Some(owned_product(5, 7))));
        repo.expect_create_review().times(0);

        let form = ReviewForm {
            importance: Some(0),
            text: Some("Хорошо".to_string()),
            ..ReviewForm::default()
        };

        let result = add_review(&repo, &plain_user(), 5, form);
        assert!(matches!(result, Err(ServiceError::Form(message))
            if message.contains("importance")));
    }

    #[test]
    fn add_review_checks_product_owner() {
        let mut repo = MockRepository::new();
        repo.expect_get_product_by_id()
            .returning(|_| Ok(Some(owned_product(5, 99))));
        repo.expect_create_review().times(0);

        let form = ReviewForm {
            text: Some("Хорошо".to_string()),
            ..ReviewForm::default()
        };

        let result = add_review(&repo, &plain_user(), 5, form);
        assert!(matches!(result, Err(ServiceError::Unauthorized)));
    }

    #[test]
    fn update_hides_foreign_reviews() {
        let mut repo = MockRepository::new();
        repo.expect_get_review_by_id().returning(|id| {
            Ok(Some(Review {
                id,
                user_id: 99,
                ..Review::default()
            }))
        });
        repo.expect_update_review().times(0);

        let result = update_review(&repo, &plain_user(), 3, ReviewForm::default());
        assert!(matches!(result, Err(ServiceError::NotFound)));
    }

    #[test]
    fn delete_answers_with_the_deleted_id() {
        let mut repo = MockRepository::new();
        repo.expect_get_review_by_id().returning(|id| {
            Ok(Some(Review {
                id,
                user_id: 7,
                ..Review::default()
            }))
        });
        repo.expect_delete_review()
            .withf(|id| *id == 3)
            .times(1)
            .returning(|_| Ok(()));

        let deleted = delete_review(&repo, &plain_user(), 3).expect("should delete");
        assert!(deleted.success);
        assert_eq!(deleted.deleted_id, 3);
    }

    #[test]
    fn clear_passes_the_visibility_scope() {
        let mut repo = MockRepository::new();
        repo.expect_delete_reviews_for_product()
            .withf(|product_id, user_id| *product_id == 5 && *user_id == Some(7))
            .times(1)
            .returning(|_, _| Ok(4));

        let cleared = clear_reviews(&repo, &plain_user(), 5).expect("should clear");
        assert_eq!(cleared.deleted, 4);
        assert_eq!(cleared.status, "ok");

        let mut repo = MockRepository::new();
        repo.expect_delete_reviews_for_product()
            .withf(|_, user_id| user_id.is_none())
            .times(1)
            .returning(|_, _| Ok(9));

        clear_reviews(&repo, &superuser(), 5).expect("should clear everything");
    }

    #[test]
    fn upload_reports_each_rejected_row() {
        let mut repo = MockRepository::new();
        repo.expect_get_product_by_id()
            .returning(|_| Ok(Some(owned_product(5, 7))));
        repo.expect_create_reviews()
            .withf(|rows| rows.len() == 2 && rows[0].product_id == 5 && rows[0].user_id == 7)
            .times(1)
            .returning(|rows| Ok(rows.len()));
        repo.expect_list_reviews().returning(|_| Ok((6, vec![])));

        let csv = "importance,source,text\n\
                   1,ozon,Хороший товар\n\
                   2,wb,Плохой вкус\n\
                   ,,\n\
                   0,ozon,Средний\n";
        let file = temp_upload("reviews.csv", csv.as_bytes());

        let report = upload_reviews(&repo, &plain_user(), 5, &file).expect("should ingest");
        assert_eq!(report.status, "ok");
        assert_eq!(report.success_count, 2);
        assert_eq!(report.total_rows, 4);
        assert_eq!(report.empty_rows, 1);
        assert_eq!(report.total, 6);
        assert_eq!(report.errors.len(), 2);
        assert!(report.errors[0].starts_with("Строка #3"));
        assert!(report.errors[1].contains("importance"));
    }

    #[test]
    fn upload_rejects_unknown_extension() {
        let mut repo = MockRepository::new();
        repo.expect_get_product_by_id()
            .returning(|_| Ok(Some(owned_product(5, 7))));
        repo.expect_create_reviews().times(0);
        repo.expect_list_reviews().returning(|_| Ok((0, vec![])));

        let file = temp_upload("reviews.xlsx", b"PK");
        let report = upload_reviews(&repo, &plain_user(), 5, &file).expect("should report");
        assert_eq!(report.success_count, 0);
        assert_eq!(report.total_rows, 0);
        assert_eq!(
            report.errors,
            vec!["Формат файла должен быть .json или .csv".to_string()]
        );
    }

    #[test]
    fn upload_reports_a_broken_file() {
        let mut repo = MockRepository::new();
        repo.expect_get_product_by_id()
            .returning(|_| Ok(Some(owned_product(5, 7))));
        repo.expect_create_reviews().times(0);
        repo.expect_list_reviews().returning(|_| Ok((0, vec![])));

        let file = temp_upload("reviews.json", b"{\"not\": \"a list\"}");
        let report = upload_reviews(&repo, &plain_user(), 5, &file).expect("should report");
        assert_eq!(report.success_count, 0);
        assert!(report.errors[0].starts_with("Ошибка парсинга JSON"));
    }

    #[test]
    fn analyze_counts_keyword_mentions() {
        let mut repo = MockRepository::new();
        repo.expect_get_product_by_id()
            .returning(|_| Ok(Some(owned_product(5, 7))));
        repo.expect_list_reviews().returning(|_| {
            Ok((
                3,
                vec![
                    review_with_text("Отличный сок"),
                    review_with_text("Плохой вкус"),
                    review_with_text("Нормально"),
                ],
            ))
        });
        repo.expect_set_analysis_result()
            .withf(|product_id, result| *product_id == 5 && result.contains("Всего отзывов: 3"))
            .times(1)
            .returning(|_, _| Ok(()));

        let outcome = analyze(&repo, &plain_user(), 5, &AnalyzeForm::default())
            .expect("should analyze");
        assert_eq!(
            outcome.result,
            "Итоговый анализ (заглушка):\nВсего отзывов: 3\nПозитивных: 1\nНегативных: 1\nНейтральных: 1"
        );
    }

    #[test]
    fn analyze_treats_zero_and_empty_as_no_filter() {
        let mut repo = MockRepository::new();
        repo.expect_get_product_by_id()
            .returning(|_| Ok(Some(owned_product(5, 7))));
        repo.expect_list_reviews()
            .withf(|query| {
                query.importance.is_none()
                    && query.source.is_none()
                    && query.rating_min == Some(40)
                    && query.rating_max.is_none()
            })
            .times(1)
            .returning(|_| Ok((0, vec![])));
        repo.expect_set_analysis_result().returning(|_, _| Ok(()));

        let form = AnalyzeForm {
            importance: Some(0),
            source: Some(String::new()),
            normalized_rating_min: Some(40),
            normalized_rating_max: Some(0),
            ..AnalyzeForm::default()
        };

        analyze(&repo, &plain_user(), 5, &form).expect("should analyze");
    }

    #[test]
    fn csv_rows_accept_comma_decimals() {
        let drafts = decode_csv(b"source,rating,max_rating\nozon,\"4,5\",5\n")
            .expect("should parse");
        assert_eq!(drafts.len(), 1);
        assert_eq!(drafts[0].source.as_deref(), Some("ozon"));
        assert_eq!(drafts[0].rating, Some(4.5));
        assert_eq!(drafts[0].max_rating, Some(5.0));
    }

    #[test]
    fn json_rows_coerce_strings_and_numbers() {
        let drafts = decode_json(
            r#"[{" importance ": "2", "text": "Хорошо", "rating": "4,5", "max_rating": 5}]"#.as_bytes(),
        )
        .expect("should parse");
        assert_eq!(drafts.len(), 1);
        assert_eq!(drafts[0].importance, Some(2));
        assert_eq!(drafts[0].text.as_deref(), Some("Хорошо"));
        assert_eq!(drafts[0].rating, Some(4.5));
        assert_eq!(drafts[0].max_rating, Some(5.0));
    }
}
