/// Slippy-map tile arithmetic for the map view.
///
/// The service only computes tile URLs; rendering is the client's concern.

/// Tile x/y indices for a coordinate at the given zoom
pub fn tile_indices(lat: f64, lng: f64, zoom: u8) -> (i64, i64) {
    let zoom = zoom.min(22);
    let n = 1_i64 << zoom;

    let x_raw = ((lng + 180.0) / 360.0 * (n as f64)).floor() as i64;
    let lat_rad = lat.to_radians();
    let y_raw = ((1.0 - (lat_rad.tan() + 1.0 / lat_rad.cos()).ln() / std::f64::consts::PI) / 2.0
        * (n as f64))
        .floor() as i64;

    // wrap x around the antimeridian, clamp y at the poles
    let x = ((x_raw % n) + n) % n;
    let y = y_raw.clamp(0, n - 1);
    (x, y)
}

/// Interpolate a `{z}/{x}/{y}` tile URL template for a coordinate
pub fn tile_url(template: &str, lat: f64, lng: f64, zoom: u8) -> String {
    let zoom = zoom.min(22);
    let (x, y) = tile_indices(lat, lng, zoom);

    let mut url = template.to_string();
    url = url.replace("{z}", &zoom.to_string());
    url = url.replace("{zoom}", &zoom.to_string());
    url = url.replace("{x}", &x.to_string());
    url = url.replace("{y}", &y.to_string());
    if url.contains("{s}") {
        url = url.replace("{s}", "a");
    }
    url
}
