mod common;

use anyhow::Result;
use serde_json::{json, Value};

#[tokio::test]
async fn quick_dev() -> Result<()> {
    let origin = common::spawn_app().await;
    let hc = httpc_test::new_client(format!("{origin}/api"))?;

    let res = hc.do_post("/categories", json!({ "name": "Tech" })).await?;
    assert_eq!(res.status().as_u16(), 201);
    let body = res.json_body()?;
    assert_eq!(body["data"], json!({ "id": 1, "name": "Tech" }));

    let res = hc.do_post("/tags", json!({ "name": "rust" })).await?;
    assert_eq!(res.status().as_u16(), 201);
    let tag_id = res.json_body()?["data"]["id"].as_i64().unwrap_or_default();

    let res = hc
        .do_post(
            "/posts",
            json!({
                "title": "Hi",
                "content": "Body",
                "categoryIds": [1],
                "tagIds": [tag_id],
            }),
        )
        .await?;
    assert_eq!(res.status().as_u16(), 201);
    let post = res.json_body()?;
    assert_eq!(post["status"], "draft");
    assert_eq!(post["categories"], json!([{ "id": 1, "name": "Tech" }]));
    assert_eq!(post["tags"], json!([{ "id": tag_id, "name": "rust" }]));
    let post_id = post["id"].as_i64().unwrap_or_default();

    let res = hc.do_get("/posts").await?;
    assert_eq!(res.status().as_u16(), 200);
    let summaries = res.json_body()?;
    assert_eq!(summaries[0]["id"], post_id);
    assert!(summaries[0].get("content").is_none());
    assert!(summaries[0].get("categories").is_none());

    let res = hc.do_delete("/categories/1").await?;
    assert_eq!(res.status().as_u16(), 200);

    let res = hc.do_get(&format!("/posts/{post_id}")).await?;
    assert_eq!(res.status().as_u16(), 200);
    let post = res.json_body()?;
    assert_eq!(post["categories"], json!([]));
    assert_eq!(post["tags"].as_array().map(Vec::len), Some(1));

    let res = hc
        .do_put(
            &format!("/posts/{post_id}"),
            json!({ "title": "Hi again", "status": "published" }),
        )
        .await?;
    assert_eq!(res.status().as_u16(), 200);
    let post = res.json_body()?;
    assert_eq!(post["title"], "Hi again");
    assert_eq!(post["content"], "Body");
    assert_eq!(post["status"], "published");
    assert_eq!(post["tags"], json!([]));

    let res = hc.do_delete(&format!("/posts/{post_id}")).await?;
    assert_eq!(res.status().as_u16(), 204);

    let res = hc.do_get(&format!("/posts/{post_id}")).await?;
    assert_eq!(res.status().as_u16(), 404);

    Ok(())
}

#[tokio::test]
async fn invalid_posts_are_rejected_without_writes() -> Result<()> {
    let origin = common::spawn_app().await;
    let hc = httpc_test::new_client(format!("{origin}/api"))?;

    let res = hc.do_post("/posts", json!({ "content": "Body" })).await?;
    assert_eq!(res.status().as_u16(), 400);
    assert_eq!(res.json_body()?["error"], "Title is required");

    let res = hc.do_post("/posts", json!({ "title": "Hi" })).await?;
    assert_eq!(res.status().as_u16(), 400);
    assert_eq!(res.json_body()?["error"], "Content is required");

    let res = hc
        .do_post(
            "/posts",
            json!({ "title": "Hi", "content": "Body", "status": "archived" }),
        )
        .await?;
    assert_eq!(res.status().as_u16(), 400);

    let res = hc
        .do_post(
            "/posts",
            json!({ "title": "Hi", "content": "Body", "categoryIds": [99] }),
        )
        .await?;
    assert_eq!(res.status().as_u16(), 400);

    let res = hc.do_get("/posts").await?;
    assert_eq!(res.json_body()?, json!([]));

    Ok(())
}

#[tokio::test]
async fn missing_ids_return_404_and_mutate_nothing() -> Result<()> {
    let origin = common::spawn_app().await;
    let hc = httpc_test::new_client(format!("{origin}/api"))?;

    let res = hc
        .do_put("/posts/41", json!({ "title": "Hi", "content": "Body" }))
        .await?;
    assert_eq!(res.status().as_u16(), 404);

    let res = hc.do_delete("/posts/41").await?;
    assert_eq!(res.status().as_u16(), 404);

    for collection in ["categories", "tags"] {
        let res = hc.do_get(&format!("/{collection}/5")).await?;
        assert_eq!(res.status().as_u16(), 404);

        let res = hc
            .do_put(&format!("/{collection}/5"), json!({ "name": "x" }))
            .await?;
        assert_eq!(res.status().as_u16(), 404);

        let res = hc.do_delete(&format!("/{collection}/5")).await?;
        assert_eq!(res.status().as_u16(), 404);

        let res = hc.do_get(&format!("/{collection}")).await?;
        assert_eq!(res.json_body()?, json!({ "data": [] }));
    }

    let res = hc.do_get("/posts/not-a-number").await?;
    assert_eq!(res.status().as_u16(), 404);

    let res = hc.do_get("/posts").await?;
    assert_eq!(res.json_body()?, json!([]));

    Ok(())
}

#[tokio::test]
async fn taxonomy_names_are_required() -> Result<()> {
    let origin = common::spawn_app().await;
    let hc = httpc_test::new_client(format!("{origin}/api"))?;

    let res = hc.do_post("/tags", json!({})).await?;
    assert_eq!(res.status().as_u16(), 400);
    assert_eq!(res.json_body()?["error"], "Name is required");

    let res = hc.do_post("/tags", json!({ "name": "rust" })).await?;
    let id = res.json_body()?["data"]["id"].clone();

    let res = hc.do_put(&format!("/tags/{id}"), json!({ "name": "" })).await?;
    assert_eq!(res.status().as_u16(), 400);

    let res = hc
        .do_put(&format!("/tags/{id}"), json!({ "name": "Rust" }))
        .await?;
    assert_eq!(res.status().as_u16(), 200);
    let body: Value = res.json_body()?;
    assert_eq!(body["data"]["name"], "Rust");
    assert_eq!(body["message"], "Tag updated successfully");

    // Names are not unique.
    let res = hc.do_post("/tags", json!({ "name": "Rust" })).await?;
    assert_eq!(res.status().as_u16(), 201);

    Ok(())
}

#[tokio::test]
async fn unknown_api_paths_return_json_404() -> Result<()> {
    let origin = common::spawn_app().await;
    let hc = httpc_test::new_client(origin.as_str())?;

    for path in ["/api/unknown", "/api/", "/api/posts/1/comments"] {
        let res = hc.do_get(path).await?;
        assert_eq!(res.status().as_u16(), 404, "{path}");
        assert_eq!(res.json_body()?["error"], "API endpoint not found", "{path}");
    }

    Ok(())
}

#[tokio::test]
async fn other_paths_serve_the_spa_entry_document() -> Result<()> {
    let frontend_dir =
        std::env::temp_dir().join(format!("blog-admin-spa-{}", std::process::id()));
    std::fs::create_dir_all(&frontend_dir)?;
    std::fs::write(
        frontend_dir.join("index.html"),
        "<!doctype html><div id=\"root\"></div>",
    )?;

    let origin = common::spawn_app_with_frontend(frontend_dir).await;
    let hc = httpc_test::new_client(origin.as_str())?;

    for path in ["/posts/12/edit", "/api"] {
        let res = hc.do_get(path).await?;
        assert_eq!(res.status().as_u16(), 200, "{path}");
        assert!(res.text_body()?.contains("id=\"root\""), "{path}");
    }

    Ok(())
}
