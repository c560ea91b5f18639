use prodrev::domain::directory::{DirectoryKind, NewDirectoryEntry, UpdateDirectoryEntry};
use prodrev::domain::product::{NewProduct, NewProductImage, UpdateProduct};
use prodrev::domain::review::{NewReview, ReviewDraft, UpdateReview};
use prodrev::domain::user::NewUser;
use prodrev::repository::{
    DieselRepository, DirectoryReader, DirectoryWriter, ProductListQuery, ProductReader,
    ProductWriter, RefFilter, ReviewListQuery, ReviewReader, ReviewWriter, UserReader, UserWriter,
};
use prodrev::table::SortDir;

mod common;

fn seed_user(repo: &DieselRepository, username: &str) -> i32 {
    repo.create_user(&NewUser::new(username.to_string(), "hash".to_string()))
        .unwrap()
        .id
}

#[test]
fn test_user_repository_crud() {
    let test_db = common::TestDb::new("test_user_repository_crud.db");
    let repo = DieselRepository::new(test_db.pool());

    let user = repo
        .create_user(&NewUser::new("  Admin ".to_string(), "hash".to_string()))
        .unwrap();
    assert_eq!(user.username, "admin");
    assert!(!user.is_superuser);

    let by_id = repo.get_user_by_id(user.id).unwrap().unwrap();
    assert_eq!(by_id.username, "admin");

    let by_name = repo.get_user_by_username("admin").unwrap().unwrap();
    assert_eq!(by_name.id, user.id);

    assert!(repo.get_user_by_username("missing").unwrap().is_none());
}

#[test]
fn test_directory_repository_crud() {
    let test_db = common::TestDb::new("test_directory_repository_crud.db");
    let repo = DieselRepository::new(test_db.pool());
    let user_id = seed_user(&repo, "owner");

    let sony = repo
        .create_directory_entry(
            DirectoryKind::Brand,
            &NewDirectoryEntry::new(user_id, " Sony ".to_string(), Some(" TVs ".to_string())),
        )
        .unwrap();
    assert_eq!(sony.name, "Sony");
    assert_eq!(sony.description.as_deref(), Some("TVs"));

    repo.create_directory_entry(
        DirectoryKind::Brand,
        &NewDirectoryEntry::new(user_id, "Apple".to_string(), None),
    )
    .unwrap();
    // Same name in another kind lands in its own table.
    repo.create_directory_entry(
        DirectoryKind::Category,
        &NewDirectoryEntry::new(user_id, "Sony".to_string(), None),
    )
    .unwrap();

    let brands = repo
        .list_directory_entries(DirectoryKind::Brand, Some(user_id))
        .unwrap();
    assert_eq!(brands.len(), 2);
    assert_eq!(brands[0].name, "Apple");
    assert_eq!(brands[1].name, "Sony");

    let updated = repo
        .update_directory_entry(
            DirectoryKind::Brand,
            sony.id,
            &UpdateDirectoryEntry::new("Sony Group".to_string(), None),
        )
        .unwrap();
    assert_eq!(updated.name, "Sony Group");
    assert_eq!(updated.description, None);

    repo.delete_directory_entry(DirectoryKind::Brand, sony.id)
        .unwrap();
    assert!(
        repo.get_directory_entry(DirectoryKind::Brand, sony.id)
            .unwrap()
            .is_none()
    );
    assert_eq!(
        repo.list_directory_entries(DirectoryKind::Brand, None)
            .unwrap()
            .len(),
        1
    );
}

#[test]
fn test_product_listing_filters_and_sort() {
    let test_db = common::TestDb::new("test_product_listing_filters_and_sort.db");
    let repo = DieselRepository::new(test_db.pool());
    let owner = seed_user(&repo, "owner");
    let other = seed_user(&repo, "other");

    let brand = repo
        .create_directory_entry(
            DirectoryKind::Brand,
            &NewDirectoryEntry::new(owner, "Добрый".to_string(), None),
        )
        .unwrap();
    let category = repo
        .create_directory_entry(
            DirectoryKind::Category,
            &NewDirectoryEntry::new(owner, "Соки".to_string(), None),
        )
        .unwrap();

    let juice = repo
        .create_product(&NewProduct::new(
            owner,
            Some("Сок яблочный".to_string()),
            None,
            Some("4601234567893".to_string()),
            None,
            Some(brand.id),
            Some(category.id),
            None,
        ))
        .unwrap();
    let water = repo
        .create_product(&NewProduct::new(
            owner,
            Some("Вода".to_string()),
            None,
            None,
            None,
            None,
            None,
            None,
        ))
        .unwrap();
    repo.create_product(&NewProduct::new(
        other,
        Some("Сок чужой".to_string()),
        None,
        None,
        None,
        None,
        None,
        None,
    ))
    .unwrap();

    let (total, _) = repo
        .list_products(ProductListQuery::new().owner(owner))
        .unwrap();
    assert_eq!(total, 2);

    let (total_all, _) = repo.list_products(ProductListQuery::new()).unwrap();
    assert_eq!(total_all, 3);

    let mut query = ProductListQuery::new().owner(owner);
    query.name = Some("Сок".to_string());
    let (total, items) = repo.list_products(query).unwrap();
    assert_eq!(total, 1);
    assert_eq!(items[0].product.id, juice.id);
    assert_eq!(items[0].brand_name.as_deref(), Some("Добрый"));
    assert_eq!(items[0].category_name.as_deref(), Some("Соки"));

    let mut query = ProductListQuery::new().owner(owner);
    query.brand = Some(RefFilter::IsNull);
    let (_, items) = repo.list_products(query).unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].product.id, water.id);

    let mut query = ProductListQuery::new().owner(owner);
    query.brand = Some(RefFilter::Id(brand.id));
    let (_, items) = repo.list_products(query).unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].product.id, juice.id);

    let mut query = ProductListQuery::new().owner(owner).paginate(1, 1);
    query.sort_by = "name".to_string();
    query.sort_dir = SortDir::Desc;
    let (total, page) = repo.list_products(query).unwrap();
    assert_eq!(total, 2);
    assert_eq!(page.len(), 1);
    assert_eq!(page[0].product.name.as_deref(), Some("Сок яблочный"));
}

#[test]
fn test_product_position_follows_listing_order() {
    let test_db = common::TestDb::new("test_product_position_follows_listing_order.db");
    let repo = DieselRepository::new(test_db.pool());
    let owner = seed_user(&repo, "owner");

    let names = ["Арбуз", "Банан", "Вишня"];
    let mut ids = Vec::new();
    for name in names {
        let product = repo
            .create_product(&NewProduct::new(
                owner,
                Some(name.to_string()),
                None,
                None,
                None,
                None,
                None,
                None,
            ))
            .unwrap();
        ids.push(product.id);
    }
    let banana = ids[1];

    let mut query = ProductListQuery::new().owner(owner);
    query.sort_by = "name".to_string();
    query.sort_dir = SortDir::Desc;
    assert_eq!(
        repo.product_position(banana, query.clone()).unwrap(),
        Some(1)
    );

    assert_eq!(repo.product_position(9999, query).unwrap(), None);

    // A product the filters exclude has no position.
    let mut query = ProductListQuery::new().owner(owner);
    query.name = Some("Вишня".to_string());
    assert_eq!(repo.product_position(banana, query).unwrap(), None);
}

#[test]
fn test_main_image_replacement() {
    let test_db = common::TestDb::new("test_main_image_replacement.db");
    let repo = DieselRepository::new(test_db.pool());
    let owner = seed_user(&repo, "owner");
    let product = repo
        .create_product(&NewProduct::new(
            owner,
            Some("Сок".to_string()),
            None,
            None,
            None,
            None,
            None,
            None,
        ))
        .unwrap();

    let first = repo
        .replace_main_image(&NewProductImage {
            product_id: product.id,
            user_id: owner,
            image_path: "one.jpg".to_string(),
            is_main: true,
        })
        .unwrap();
    assert!(first.is_main);

    let second = repo
        .replace_main_image(&NewProductImage {
            product_id: product.id,
            user_id: owner,
            image_path: "two.jpg".to_string(),
            is_main: true,
        })
        .unwrap();

    let gallery = repo
        .add_product_image(&NewProductImage {
            product_id: product.id,
            user_id: owner,
            image_path: "extra.jpg".to_string(),
            is_main: false,
        })
        .unwrap();

    let images = repo.list_product_images(product.id).unwrap();
    assert_eq!(images.len(), 3);
    // The current main image sorts first.
    assert_eq!(images[0].id, second.id);
    assert!(images[0].is_main);
    let demoted = images.iter().find(|image| image.id == first.id).unwrap();
    assert!(!demoted.is_main);

    repo.delete_product_image(gallery.id).unwrap();
    assert!(repo.get_product_image(gallery.id).unwrap().is_none());
    assert_eq!(repo.list_product_images(product.id).unwrap().len(), 2);
}

#[test]
fn test_product_delete_cascades() {
    let test_db = common::TestDb::new("test_product_delete_cascades.db");
    let repo = DieselRepository::new(test_db.pool());
    let owner = seed_user(&repo, "owner");
    let product = repo
        .create_product(&NewProduct::new(
            owner,
            Some("Сок".to_string()),
            None,
            None,
            None,
            None,
            None,
            None,
        ))
        .unwrap();

    let image = repo
        .replace_main_image(&NewProductImage {
            product_id: product.id,
            user_id: owner,
            image_path: "main.jpg".to_string(),
            is_main: true,
        })
        .unwrap();
    let review = repo
        .create_review(&NewReview {
            product_id: product.id,
            user_id: owner,
            text: Some("Хорошо".to_string()),
            normalized_rating: Some(80),
            ..NewReview::default()
        })
        .unwrap();

    repo.delete_product(product.id).unwrap();

    assert!(repo.get_product_by_id(product.id).unwrap().is_none());
    assert!(repo.get_product_image(image.id).unwrap().is_none());
    assert!(repo.get_review_by_id(review.id).unwrap().is_none());
}

#[test]
fn test_deleting_a_brand_unlinks_products() {
    let test_db = common::TestDb::new("test_deleting_a_brand_unlinks_products.db");
    let repo = DieselRepository::new(test_db.pool());
    let owner = seed_user(&repo, "owner");
    let brand = repo
        .create_directory_entry(
            DirectoryKind::Brand,
            &NewDirectoryEntry::new(owner, "Добрый".to_string(), None),
        )
        .unwrap();
    let product = repo
        .create_product(&NewProduct::new(
            owner,
            Some("Сок".to_string()),
            None,
            None,
            None,
            Some(brand.id),
            None,
            None,
        ))
        .unwrap();

    repo.delete_directory_entry(DirectoryKind::Brand, brand.id)
        .unwrap();

    let product = repo.get_product_by_id(product.id).unwrap().unwrap();
    assert_eq!(product.brand_id, None);
}

#[test]
fn test_review_listing_filters() {
    let test_db = common::TestDb::new("test_review_listing_filters.db");
    let repo = DieselRepository::new(test_db.pool());
    let owner = seed_user(&repo, "owner");
    let other = seed_user(&repo, "other");
    let product = repo
        .create_product(&NewProduct::new(
            owner,
            Some("Сок".to_string()),
            None,
            None,
            None,
            None,
            None,
            None,
        ))
        .unwrap();

    let excellent = repo
        .create_review(&NewReview {
            product_id: product.id,
            user_id: owner,
            importance: Some(5),
            source: Some("Ozon".to_string()),
            text: Some("Отличный товар".to_string()),
            normalized_rating: Some(90),
            ..NewReview::default()
        })
        .unwrap();
    let average = repo
        .create_review(&NewReview {
            product_id: product.id,
            user_id: owner,
            importance: Some(3),
            source: Some("WB".to_string()),
            text: Some("Нормально".to_string()),
            advantages: Some("цена".to_string()),
            normalized_rating: Some(60),
            ..NewReview::default()
        })
        .unwrap();
    repo.create_review(&NewReview {
        product_id: product.id,
        user_id: other,
        source: Some("Ozon".to_string()),
        normalized_rating: Some(20),
        ..NewReview::default()
    })
    .unwrap();

    let (total, _) = repo.list_reviews(ReviewListQuery::new(product.id)).unwrap();
    assert_eq!(total, 3);

    let (total, _) = repo
        .list_reviews(ReviewListQuery::new(product.id).owner(owner))
        .unwrap();
    assert_eq!(total, 2);

    let mut query = ReviewListQuery::new(product.id);
    query.importance = Some(5);
    let (_, items) = repo.list_reviews(query).unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].id, excellent.id);

    let mut query = ReviewListQuery::new(product.id);
    query.source = Some("Ozon".to_string());
    let (total, _) = repo.list_reviews(query).unwrap();
    assert_eq!(total, 2);

    let mut query = ReviewListQuery::new(product.id);
    query.rating_min = Some(50);
    query.rating_max = Some(60);
    let (_, items) = repo.list_reviews(query).unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].id, average.id);

    let mut query = ReviewListQuery::new(product.id).paginate(1, 2);
    query.sort_by = "normalized_rating".to_string();
    query.sort_dir = SortDir::Desc;
    let (total, items) = repo.list_reviews(query).unwrap();
    assert_eq!(total, 3);
    assert_eq!(items.len(), 2);
    assert_eq!(items[0].id, excellent.id);
    assert_eq!(items[1].id, average.id);
}

#[test]
fn test_review_update_and_clear() {
    let test_db = common::TestDb::new("test_review_update_and_clear.db");
    let repo = DieselRepository::new(test_db.pool());
    let owner = seed_user(&repo, "owner");
    let other = seed_user(&repo, "other");
    let product = repo
        .create_product(&NewProduct::new(
            owner,
            Some("Сок".to_string()),
            None,
            None,
            None,
            None,
            None,
            None,
        ))
        .unwrap();

    let batch = vec![
        NewReview {
            product_id: product.id,
            user_id: owner,
            importance: Some(4),
            text: Some("Первый".to_string()),
            ..NewReview::default()
        },
        NewReview {
            product_id: product.id,
            user_id: owner,
            text: Some("Второй".to_string()),
            ..NewReview::default()
        },
    ];
    assert_eq!(repo.create_reviews(&batch).unwrap(), 2);
    repo.create_review(&NewReview {
        product_id: product.id,
        user_id: other,
        text: Some("Чужой".to_string()),
        ..NewReview::default()
    })
    .unwrap();

    let (_, items) = repo
        .list_reviews(ReviewListQuery::new(product.id).owner(owner))
        .unwrap();
    let first = items[0].clone();

    // An update replaces every field, clearing the ones the form left
    // empty.
    let updates = UpdateReview::from_draft(ReviewDraft {
        text: Some("Изменено".to_string()),
        raw_rating: Some("3/5".to_string()),
        ..ReviewDraft::default()
    })
    .unwrap();
    let updated = repo.update_review(first.id, &updates).unwrap();
    assert_eq!(updated.text.as_deref(), Some("Изменено"));
    assert_eq!(updated.normalized_rating, Some(60));
    assert_eq!(updated.importance, None);

    repo.delete_review(first.id).unwrap();
    assert!(repo.get_review_by_id(first.id).unwrap().is_none());

    // Owner-scoped clear leaves the other user's review in place.
    assert_eq!(
        repo.delete_reviews_for_product(product.id, Some(owner))
            .unwrap(),
        1
    );
    let (total, _) = repo.list_reviews(ReviewListQuery::new(product.id)).unwrap();
    assert_eq!(total, 1);

    assert_eq!(
        repo.delete_reviews_for_product(product.id, None).unwrap(),
        1
    );
    let (total, _) = repo.list_reviews(ReviewListQuery::new(product.id)).unwrap();
    assert_eq!(total, 0);
}

#[test]
fn test_product_update_replaces_fields() {
    let test_db = common::TestDb::new("test_product_update_replaces_fields.db");
    let repo = DieselRepository::new(test_db.pool());
    let owner = seed_user(&repo, "owner");
    let brand = repo
        .create_directory_entry(
            DirectoryKind::Brand,
            &NewDirectoryEntry::new(owner, "Добрый".to_string(), None),
        )
        .unwrap();
    let product = repo
        .create_product(&NewProduct::new(
            owner,
            Some("Сок".to_string()),
            Some("Яблочный".to_string()),
            Some("4601234567893".to_string()),
            None,
            Some(brand.id),
            None,
            None,
        ))
        .unwrap();

    let updated = repo
        .update_product(
            product.id,
            &UpdateProduct::new(
                Some("Сок персиковый".to_string()),
                None,
                None,
                None,
                None,
                None,
                None,
            ),
        )
        .unwrap();
    assert_eq!(updated.name.as_deref(), Some("Сок персиковый"));
    assert_eq!(updated.description, None);
    assert_eq!(updated.ean, None);
    assert_eq!(updated.brand_id, None);
    assert_eq!(updated.user_id, owner);

    repo.set_analysis_result(product.id, "Итог: положительные отзывы")
        .unwrap();
    let stored = repo.get_product_by_id(product.id).unwrap().unwrap();
    assert_eq!(
        stored.analysis_result.as_deref(),
        Some("Итог: положительные отзывы")
    );
}
