use axum::{extract::Path, response::Response, Form};
use tracing::info;

use crate::common::FormErrors;
use crate::domains::content::{Video, VideoCategory, VideoForm};
use crate::server::error::AppResult;
use crate::server::extractors::StaffContext;
use crate::server::routes::admin::{admin_body, created_line, parse_id};
use crate::server::views::{empty, escape, forms, multiline};

pub async fn list(staff: StaffContext) -> AppResult {
    let videos = Video::find_all(staff.page.db()).await?;
    let rows = if videos.is_empty() {
        empty("No videos yet.")
    } else {
        let rows: String = videos
            .iter()
            .map(|v| {
                format!(
                    r#"<tr><td><a href="/admin/videos/{}">{}</a></td><td>{}</td><td>{}</td></tr>"#,
                    v.id,
                    escape(&v.title),
                    escape(&v.category),
                    escape(&v.duration)
                )
            })
            .collect();
        format!("<table><thead><tr><th>Title</th><th>Category</th><th>Duration</th></tr></thead><tbody>{rows}</tbody></table>")
    };
    let body = admin_body(format!(
        r#"<h1>Videos</h1><p><a class="button" href="/admin/videos/new">Add video</a></p>{rows}"#
    ));
    Ok(staff.page.render("Videos", body).await)
}

fn form_body(form: &VideoForm, errors: &FormErrors) -> String {
    let categories = VideoCategory::ALL.map(|c| (c.as_str(), c.as_str()));
    let selected = if form.category.is_empty() {
        VideoCategory::default().as_str()
    } else {
        form.category.as_str()
    };
    let fields = [
        forms::input("Title", "title", "text", &form.title, errors),
        forms::textarea("Description", "description", &form.description, errors),
        forms::input("Video URL", "video_url", "url", &form.video_url, errors),
        forms::input("Thumbnail URL (optional)", "thumbnail_url", "url", &form.thumbnail_url, errors),
        forms::input("Duration (e.g. 12:30)", "duration", "text", &form.duration, errors),
        forms::select("Category", "category", categories, selected, errors),
    ]
    .concat();
    admin_body(format!(
        "<h1>Add video</h1>{}",
        forms::form("/admin/videos/new", false, &fields, "Save video")
    ))
}

pub async fn new_form(staff: StaffContext) -> Response {
    staff
        .page
        .render("Add video", form_body(&VideoForm::default(), &FormErrors::new()))
        .await
}

pub async fn create(staff: StaffContext, Form(form): Form<VideoForm>) -> AppResult {
    match form.validate() {
        Ok(input) => {
            let video = Video::create(input, &staff.user.username, staff.page.db()).await?;
            info!(video_id = %video.id, "Video added");
            Ok(staff
                .page
                .success(
                    "Video added successfully!",
                    &format!("/admin/videos/{}", video.id),
                )
                .await)
        }
        Err(errors) => {
            staff.page.session.error("Please correct the errors below.").await;
            Ok(staff.page.render("Add video", form_body(&form, &errors)).await)
        }
    }
}

pub async fn detail(staff: StaffContext, Path(id): Path<String>) -> AppResult {
    let video = match parse_id(&id) {
        Some(id) => Video::find_by_id(id, staff.page.db()).await?,
        None => None,
    };
    let Some(video) = video else {
        return Ok(staff.page.error("Video not found.", "/admin/videos").await);
    };

    let thumbnail = if video.thumbnail_url.is_empty() {
        String::new()
    } else {
        format!(
            r#"<p><img class="thumbnail" src="{}" alt="{}"></p>"#,
            escape(&video.thumbnail_url),
            escape(&video.title)
        )
    };
    let duration = if video.duration.is_empty() {
        String::new()
    } else {
        format!(" &middot; {}", escape(&video.duration))
    };
    let body = admin_body(format!(
        r#"<article class="detail">
<h1>{title}</h1>
<p class="meta">{category}{duration}</p>
{created}
{thumbnail}
<p>{description}</p>
<p><a href="{url}" rel="noopener" target="_blank">Watch video</a></p>
<p><a href="/admin/videos">Back to videos</a></p>
</article>"#,
        title = escape(&video.title),
        category = escape(&video.category),
        created = created_line(&video.created_by, video.created_at),
        description = multiline(&video.description),
        url = escape(&video.video_url),
    ));
    Ok(staff.page.render(&video.title, body).await)
}
