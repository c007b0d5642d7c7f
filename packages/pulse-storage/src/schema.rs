pub fn render_schema() -> String {
	expand_includes(include_str!("../../../sql/init.sql"))
}

fn expand_includes(sql: &str) -> String {
	let mut out = String::new();

	for line in sql.lines() {
		let trimmed = line.trim();

		if let Some(path) = trimmed.strip_prefix("\\ir ") {
			match path.trim() {
				"tables/001_users.sql" =>
					out.push_str(include_str!("../../../sql/tables/001_users.sql")),
				"tables/002_user_badges.sql" =>
					out.push_str(include_str!("../../../sql/tables/002_user_badges.sql")),
				"tables/003_follows.sql" =>
					out.push_str(include_str!("../../../sql/tables/003_follows.sql")),
				"tables/004_connections.sql" =>
					out.push_str(include_str!("../../../sql/tables/004_connections.sql")),
				"tables/005_user_blocks.sql" =>
					out.push_str(include_str!("../../../sql/tables/005_user_blocks.sql")),
				"tables/006_circles.sql" =>
					out.push_str(include_str!("../../../sql/tables/006_circles.sql")),
				"tables/007_circle_members.sql" =>
					out.push_str(include_str!("../../../sql/tables/007_circle_members.sql")),
				"tables/008_activity_log.sql" =>
					out.push_str(include_str!("../../../sql/tables/008_activity_log.sql")),
				"tables/009_circle_posts.sql" =>
					out.push_str(include_str!("../../../sql/tables/009_circle_posts.sql")),
				"tables/010_individual_posts.sql" =>
					out.push_str(include_str!("../../../sql/tables/010_individual_posts.sql")),
				"tables/011_circle_post_likes.sql" =>
					out.push_str(include_str!("../../../sql/tables/011_circle_post_likes.sql")),
				"tables/012_individual_post_likes.sql" =>
					out.push_str(include_str!("../../../sql/tables/012_individual_post_likes.sql")),
				"tables/013_sessions.sql" =>
					out.push_str(include_str!("../../../sql/tables/013_sessions.sql")),
				_ => out.push_str(line),
			}
		} else {
			out.push_str(line);
		}

		out.push('\n');
	}

	out
}
